use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::{
    application::{
        admin::manager::{CollectionManager, DropOutcome},
        repos::{CollectionRepo, RepoError},
    },
    domain::{collection::CollectionEntity, error::DomainError},
};

#[derive(Debug, Error)]
pub enum AdminCollectionError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("record not found")]
    NotFound,
    #[error("update payload contains no fields")]
    EmptyPatch,
    #[error("deletion was not confirmed")]
    Declined,
    #[error("invalid order: {0}")]
    InvalidOrder(String),
    #[error("reorder was rejected by storage")]
    ReorderFailed {
        #[source]
        source: RepoError,
        /// Order the manager fell back to.
        restored: Vec<Uuid>,
    },
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for AdminCollectionError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => Self::NotFound,
            other => Self::Repo(other),
        }
    }
}

/// Admin operations over one ordered collection. Every mutating call works
/// through a [`CollectionManager`] loaded from a fresh snapshot.
pub struct AdminCollectionService<E: CollectionEntity> {
    repo: Arc<dyn CollectionRepo<E>>,
}

impl<E: CollectionEntity> Clone for AdminCollectionService<E> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<E: CollectionEntity> AdminCollectionService<E> {
    pub fn new(repo: Arc<dyn CollectionRepo<E>>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<E>, AdminCollectionError> {
        Ok(self.repo.list().await?)
    }

    pub async fn find(&self, id: Uuid) -> Result<E, AdminCollectionError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AdminCollectionError::NotFound)
    }

    pub async fn manager(&self) -> Result<CollectionManager<E>, AdminCollectionError> {
        Ok(CollectionManager::load(self.repo.clone()).await?)
    }

    pub async fn create(&self, draft: E::Draft) -> Result<E, AdminCollectionError> {
        self.manager().await?.create(draft).await
    }

    pub async fn update(&self, id: Uuid, patch: E::Patch) -> Result<E, AdminCollectionError> {
        self.manager().await?.update(id, patch).await
    }

    /// Delete `id` when `confirmed` is set; otherwise decline without
    /// touching storage.
    pub async fn delete(&self, id: Uuid, confirmed: bool) -> Result<E, AdminCollectionError> {
        self.manager().await?.delete(id, |_| confirmed).await
    }

    /// Persist an explicit order and return the resulting records.
    pub async fn reorder(&self, ids: &[Uuid]) -> Result<Vec<E>, AdminCollectionError> {
        let mut manager = self.manager().await?;
        manager.set_order(ids).await?;
        Ok(manager.into_items())
    }

    /// Run a whole drag gesture: `dragged` is dropped on `target`.
    pub async fn move_item(
        &self,
        dragged: Uuid,
        target: Uuid,
    ) -> Result<(DropOutcome, Vec<E>), AdminCollectionError> {
        let mut manager = self.manager().await?;
        let outcome = manager.move_item(dragged, target).await?;
        Ok((outcome, manager.into_items()))
    }

    /// Total and active record counts.
    pub async fn counts(&self) -> Result<(u64, u64), AdminCollectionError> {
        let items = self.repo.list().await?;
        let active = items.iter().filter(|item| item.is_active()).count();
        Ok((items.len() as u64, active as u64))
    }
}
