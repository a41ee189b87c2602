//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use chrono_tz::Tz;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::{
    clicks::{LinkClickRecord, NewLinkClick},
    collection::CollectionEntity,
    experiences::ExperienceDraft,
    hackathons::HackathonDraft,
    links::LinkDraft,
    profile::{ProfileRecord, UpdateProfileCommand},
    projects::ProjectDraft,
};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity {
            message: message.into(),
        }
    }
}

/// Persistence gateway for one ordered collection.
#[async_trait]
pub trait CollectionRepo<E: CollectionEntity>: Send + Sync {
    /// Every record, ordered by `order_index` then creation time.
    async fn list(&self) -> Result<Vec<E>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<E>, RepoError>;

    /// Insert a validated draft at the supplied rank and return the stored
    /// record.
    async fn create(&self, draft: E::Draft, order_index: i32) -> Result<E, RepoError>;

    async fn update(&self, id: Uuid, patch: &E::Patch) -> Result<E, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// Atomically rewrite every rank to `position + 1`. `ids` must name the
    /// whole collection; anything else is an integrity error and nothing is
    /// written.
    async fn reorder(&self, ids: &[Uuid]) -> Result<(), RepoError>;
}

#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn load_profile(&self) -> Result<ProfileRecord, RepoError>;

    async fn update_profile(
        &self,
        command: UpdateProfileCommand,
        timezone: Tz,
    ) -> Result<ProfileRecord, RepoError>;
}

#[async_trait]
pub trait LinkClicksRepo: Send + Sync {
    async fn record_click(&self, click: NewLinkClick) -> Result<LinkClickRecord, RepoError>;

    /// Clicks recorded at or after `since`, oldest first.
    async fn list_clicks_since(
        &self,
        since: OffsetDateTime,
    ) -> Result<Vec<LinkClickRecord>, RepoError>;
}

/// Content of a full archive import, collections in display order.
#[derive(Debug, Clone, Default)]
pub struct ContentReplacement {
    pub profile: Option<(UpdateProfileCommand, Tz)>,
    pub projects: Vec<ProjectDraft>,
    pub experiences: Vec<ExperienceDraft>,
    pub hackathons: Vec<HackathonDraft>,
    pub links: Vec<LinkDraft>,
}

#[async_trait]
pub trait ContentImportRepo: Send + Sync {
    /// Replace every collection (and the profile, when given) in a single
    /// transaction. Click history is dropped together with the links.
    async fn replace_content(&self, content: ContentReplacement) -> Result<(), RepoError>;
}

#[async_trait]
pub trait HealthRepo: Send + Sync {
    /// Round-trip to storage.
    async fn health_check(&self) -> Result<(), RepoError>;
}
