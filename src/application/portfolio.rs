//! Read side of the public portfolio page.

use std::sync::Arc;

use serde::Serialize;

use crate::{
    application::repos::{CollectionRepo, ProfileRepo, RepoError},
    domain::{
        collection::CollectionEntity, experiences::ExperienceRecord,
        hackathons::HackathonRecord, profile::ProfileRecord, projects::ProjectRecord,
    },
};

/// Everything the public page renders, active records only, in display
/// order.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioSnapshot {
    pub profile: ProfileRecord,
    pub featured_projects: Vec<ProjectRecord>,
    pub projects: Vec<ProjectRecord>,
    pub experiences: Vec<ExperienceRecord>,
    pub hackathons: Vec<HackathonRecord>,
}

#[derive(Clone)]
pub struct PortfolioService {
    profile: Arc<dyn ProfileRepo>,
    projects: Arc<dyn CollectionRepo<ProjectRecord>>,
    experiences: Arc<dyn CollectionRepo<ExperienceRecord>>,
    hackathons: Arc<dyn CollectionRepo<HackathonRecord>>,
}

impl PortfolioService {
    pub fn new(
        profile: Arc<dyn ProfileRepo>,
        projects: Arc<dyn CollectionRepo<ProjectRecord>>,
        experiences: Arc<dyn CollectionRepo<ExperienceRecord>>,
        hackathons: Arc<dyn CollectionRepo<HackathonRecord>>,
    ) -> Self {
        Self {
            profile,
            projects,
            experiences,
            hackathons,
        }
    }

    pub async fn profile(&self) -> Result<ProfileRecord, RepoError> {
        self.profile.load_profile().await
    }

    pub async fn snapshot(&self) -> Result<PortfolioSnapshot, RepoError> {
        let (profile, projects, experiences, hackathons) = tokio::try_join!(
            self.profile.load_profile(),
            self.projects.list(),
            self.experiences.list(),
            self.hackathons.list()
        )?;

        let projects = active(projects);
        let featured_projects = projects
            .iter()
            .filter(|project| project.featured)
            .cloned()
            .collect();

        Ok(PortfolioSnapshot {
            profile,
            featured_projects,
            projects,
            experiences: active(experiences),
            hackathons: active(hackathons),
        })
    }
}

fn active<E: CollectionEntity>(mut items: Vec<E>) -> Vec<E> {
    items.retain(CollectionEntity::is_active);
    items
}
