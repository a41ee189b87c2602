mod collections;
mod dashboard;
mod health;
mod state;

pub use state::{AdminResource, AdminState};

use axum::{Router, middleware, routing::get};

use crate::domain::{
    experiences::ExperienceRecord, hackathons::HackathonRecord, links::LinkRecord,
    projects::ProjectRecord,
};

use super::api::build_api_router;
use super::middleware::{log_responses, set_request_context};

pub fn build_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/", get(dashboard::admin_dashboard))
        .merge(manager_route::<ProjectRecord>())
        .merge(manager_route::<ExperienceRecord>())
        .merge(manager_route::<HackathonRecord>())
        .merge(manager_route::<LinkRecord>())
        .route("/_health/db", get(health::admin_health))
        .merge(build_api_router())
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

fn manager_route<E: AdminResource>() -> Router<AdminState> {
    let path = format!("/{}", E::KIND.collection_path());
    Router::new()
        .route(&path, get(collections::admin_collection::<E>))
        .route(
            &format!("{path}/rows/{{id}}"),
            get(collections::admin_collection_row::<E>),
        )
}
