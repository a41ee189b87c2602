use serde::Serialize;
use thiserror::Error;

use crate::{
    application::{
        admin::collection::{AdminCollectionError, AdminCollectionService},
        links::{LinkService, LinkServiceError},
    },
    domain::{
        analytics::ClickSummary, experiences::ExperienceRecord, hackathons::HackathonRecord,
        links::LinkRecord, projects::ProjectRecord, types::EntityKind,
    },
};

#[derive(Debug, Error)]
pub enum AdminDashboardError {
    #[error(transparent)]
    Collection(#[from] AdminCollectionError),
    #[error(transparent)]
    Links(#[from] LinkServiceError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionCount {
    pub kind: EntityKind,
    pub total: u64,
    pub active: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub collections: Vec<CollectionCount>,
    pub clicks: ClickSummary,
}

#[derive(Clone)]
pub struct AdminDashboardService {
    projects: AdminCollectionService<ProjectRecord>,
    experiences: AdminCollectionService<ExperienceRecord>,
    hackathons: AdminCollectionService<HackathonRecord>,
    links: AdminCollectionService<LinkRecord>,
    link_service: LinkService,
}

impl AdminDashboardService {
    pub fn new(
        projects: AdminCollectionService<ProjectRecord>,
        experiences: AdminCollectionService<ExperienceRecord>,
        hackathons: AdminCollectionService<HackathonRecord>,
        links: AdminCollectionService<LinkRecord>,
        link_service: LinkService,
    ) -> Self {
        Self {
            projects,
            experiences,
            hackathons,
            links,
            link_service,
        }
    }

    pub async fn snapshot(
        &self,
        days: Option<u32>,
    ) -> Result<DashboardSnapshot, AdminDashboardError> {
        let (projects, experiences, hackathons, links) = tokio::try_join!(
            self.projects.counts(),
            self.experiences.counts(),
            self.hackathons.counts(),
            self.links.counts()
        )?;
        let clicks = self.link_service.click_summary(days).await?;

        let collections = [
            (EntityKind::Project, projects),
            (EntityKind::Experience, experiences),
            (EntityKind::Hackathon, hackathons),
            (EntityKind::Link, links),
        ]
        .into_iter()
        .map(|(kind, (total, active))| CollectionCount {
            kind,
            total,
            active,
        })
        .collect();

        Ok(DashboardSnapshot {
            collections,
            clicks,
        })
    }
}
