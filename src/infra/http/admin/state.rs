use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};

use crate::application::admin::{
    collection::AdminCollectionService, dashboard::AdminDashboardService,
    profile::AdminProfileService,
};
use crate::application::links::LinkService;
use crate::application::repos::HealthRepo;
use crate::domain::{
    collection::CollectionEntity, experiences::ExperienceRecord, hackathons::HackathonRecord,
    links::LinkRecord, projects::ProjectRecord,
};
use crate::presentation::admin::views::AdminChrome;
use crate::presentation::admin::views::ManagedRecord;

#[derive(Clone)]
pub struct AdminState {
    pub health: Arc<dyn HealthRepo>,
    pub projects: AdminCollectionService<ProjectRecord>,
    pub experiences: AdminCollectionService<ExperienceRecord>,
    pub hackathons: AdminCollectionService<HackathonRecord>,
    pub links: AdminCollectionService<LinkRecord>,
    pub profile: AdminProfileService,
    pub dashboard: AdminDashboardService,
    pub link_service: LinkService,
    pub public_links_url: String,
}

impl AdminState {
    pub fn chrome(&self, active_path: &str) -> AdminChrome {
        AdminChrome::new(active_path, &self.public_links_url)
    }
}

/// A collection exposed through the admin listener, both as a manager page
/// and under `/api/{kind}`.
pub trait AdminResource:
    CollectionEntity<Draft: DeserializeOwned, Patch: DeserializeOwned> + ManagedRecord + Serialize
{
    fn service(state: &AdminState) -> &AdminCollectionService<Self>;
}

impl AdminResource for ProjectRecord {
    fn service(state: &AdminState) -> &AdminCollectionService<Self> {
        &state.projects
    }
}

impl AdminResource for ExperienceRecord {
    fn service(state: &AdminState) -> &AdminCollectionService<Self> {
        &state.experiences
    }
}

impl AdminResource for HackathonRecord {
    fn service(state: &AdminState) -> &AdminCollectionService<Self> {
        &state.hackathons
    }
}

impl AdminResource for LinkRecord {
    fn service(state: &AdminState) -> &AdminCollectionService<Self> {
        &state.links
    }
}
