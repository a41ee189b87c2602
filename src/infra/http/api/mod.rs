//! JSON API served from the admin listener.

pub mod error;
pub mod handlers;
pub mod models;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::domain::{
    experiences::ExperienceRecord, hackathons::HackathonRecord, links::LinkRecord,
    projects::ProjectRecord,
};
use crate::infra::http::admin::{AdminResource, AdminState};

pub fn build_api_router() -> Router<AdminState> {
    Router::new()
        .merge(collection_routes::<ProjectRecord>())
        .merge(collection_routes::<ExperienceRecord>())
        .merge(collection_routes::<HackathonRecord>())
        .merge(collection_routes::<LinkRecord>())
        .route(
            "/api/profile",
            get(handlers::get_profile).put(handlers::put_profile),
        )
        .route("/api/analytics/clicks", get(handlers::click_summary))
}

fn collection_routes<E: AdminResource>() -> Router<AdminState> {
    let base = format!("/api/{}", E::KIND.collection_path());
    Router::new()
        .route(
            &base,
            get(handlers::list_records::<E>).post(handlers::create_record::<E>),
        )
        .route(&format!("{base}/order"), put(handlers::reorder_records::<E>))
        .route(&format!("{base}/move"), post(handlers::move_record::<E>))
        .route(
            &format!("{base}/{{id}}"),
            get(handlers::get_record::<E>)
                .patch(handlers::update_record::<E>)
                .delete(handlers::delete_record::<E>),
        )
}
