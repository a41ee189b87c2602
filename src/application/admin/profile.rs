use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::repos::{ProfileRepo, RepoError};
use crate::domain::{
    error::DomainError,
    profile::{ProfileRecord, UpdateProfileCommand},
};

#[derive(Debug, Error)]
pub enum AdminProfileError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct AdminProfileService {
    repo: Arc<dyn ProfileRepo>,
}

impl AdminProfileService {
    pub fn new(repo: Arc<dyn ProfileRepo>) -> Self {
        Self { repo }
    }

    pub async fn load(&self) -> Result<ProfileRecord, AdminProfileError> {
        self.repo
            .load_profile()
            .await
            .map_err(AdminProfileError::from)
    }

    pub async fn update(
        &self,
        command: UpdateProfileCommand,
    ) -> Result<ProfileRecord, AdminProfileError> {
        let (command, timezone) = command.prepare()?;
        let record = self.repo.update_profile(command, timezone).await?;

        info!(
            target: "folio::admin",
            timezone = %record.timezone,
            skill_groups = record.skills.len(),
            "profile updated"
        );
        Ok(record)
    }
}
