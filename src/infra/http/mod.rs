mod admin;
pub mod api;
mod middleware;
mod public;

pub use admin::{AdminResource, AdminState, build_admin_router};
pub use middleware::REQUEST_ID_HEADER;
pub use public::{HttpState, build_router};

use std::sync::Arc;

use url::Url;

use crate::application::{
    admin::{
        collection::AdminCollectionService, dashboard::AdminDashboardService,
        profile::AdminProfileService,
    },
    error::ErrorReport,
    links::{AnalyticsWindow, LinkService},
    portfolio::PortfolioService,
    repos::{CollectionRepo, HealthRepo, LinkClicksRepo, ProfileRepo, RepoError},
};
use crate::domain::{
    experiences::ExperienceRecord, hackathons::HackathonRecord, links::LinkRecord,
    projects::ProjectRecord,
};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

fn db_health_response(result: Result<(), RepoError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

/// Storage handles the two listeners are built from.
#[derive(Clone)]
pub struct Repositories {
    pub health: Arc<dyn HealthRepo>,
    pub profile: Arc<dyn ProfileRepo>,
    pub projects: Arc<dyn CollectionRepo<ProjectRecord>>,
    pub experiences: Arc<dyn CollectionRepo<ExperienceRecord>>,
    pub hackathons: Arc<dyn CollectionRepo<HackathonRecord>>,
    pub links: Arc<dyn CollectionRepo<LinkRecord>>,
    pub clicks: Arc<dyn LinkClicksRepo>,
}

/// Wire services for the public and admin listeners. `public_url` is where
/// the admin chrome sends people to preview the links page.
pub fn build_states(
    repos: &Repositories,
    window: AnalyticsWindow,
    public_url: &Url,
) -> (HttpState, AdminState) {
    let portfolio = PortfolioService::new(
        repos.profile.clone(),
        repos.projects.clone(),
        repos.experiences.clone(),
        repos.hackathons.clone(),
    );
    let link_service = LinkService::new(
        repos.links.clone(),
        repos.clicks.clone(),
        repos.profile.clone(),
        window,
    );

    let projects = AdminCollectionService::new(repos.projects.clone());
    let experiences = AdminCollectionService::new(repos.experiences.clone());
    let hackathons = AdminCollectionService::new(repos.hackathons.clone());
    let links = AdminCollectionService::new(repos.links.clone());
    let dashboard = AdminDashboardService::new(
        projects.clone(),
        experiences.clone(),
        hackathons.clone(),
        links.clone(),
        link_service.clone(),
    );

    let http_state = HttpState {
        portfolio,
        links: link_service.clone(),
        health: repos.health.clone(),
    };
    let admin_state = AdminState {
        health: repos.health.clone(),
        projects,
        experiences,
        hackathons,
        links,
        profile: AdminProfileService::new(repos.profile.clone()),
        dashboard,
        link_service,
        public_links_url: format!("{}/links", public_url.as_str().trim_end_matches('/')),
    };

    (http_state, admin_state)
}
