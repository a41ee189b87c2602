//! In-memory repositories shared by the integration tests.

#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use chrono_tz::Tz;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use url::Url;
use uuid::Uuid;

use folio::application::links::AnalyticsWindow;
use folio::application::repos::{
    CollectionRepo, HealthRepo, LinkClicksRepo, ProfileRepo, RepoError,
};
use folio::domain::{
    clicks::{LinkClickRecord, NewLinkClick},
    collection::{CollectionEntity, EntityPatch, Ranked},
    experiences::ExperienceRecord,
    hackathons::HackathonRecord,
    links::{LinkDraft, LinkRecord},
    profile::{ProfileRecord, UpdateProfileCommand},
    projects::{ProjectDraft, ProjectRecord},
};
use folio::infra::http::{AdminState, HttpState, Repositories, build_states};

pub const PUBLIC_URL: &str = "http://localhost:3000";

/// A gateway call observed by [`MemoryCollection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create,
    Update(Uuid),
    Delete(Uuid),
    Reorder(Vec<Uuid>),
}

pub struct MemoryCollection<E> {
    items: Mutex<Vec<E>>,
    calls: Mutex<Vec<Call>>,
    fail_reorder: AtomicBool,
    fail_writes: AtomicBool,
}

impl<E> Default for MemoryCollection<E> {
    fn default() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            fail_reorder: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }
}

impl<E: CollectionEntity> MemoryCollection<E> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Store drafts directly, ranked in the given order, bypassing the call log.
    pub async fn seed(&self, drafts: Vec<E::Draft>) -> Vec<Uuid> {
        let mut items = self.items.lock().await;
        let now = OffsetDateTime::now_utc();
        let mut ids = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let rank = i32::try_from(items.len() + 1).expect("rank");
            let record = E::materialize(Uuid::new_v4(), draft, rank, now);
            ids.push(record.id());
            items.push(record);
        }
        ids
    }

    pub fn fail_reorders(&self, fail: bool) {
        self.fail_reorder.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    pub async fn reorder_calls(&self) -> Vec<Vec<Uuid>> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                Call::Reorder(ids) => Some(ids.clone()),
                _ => None,
            })
            .collect()
    }

    /// Identifiers in stored rank order.
    pub async fn stored_ids(&self) -> Vec<Uuid> {
        let mut items = self.items.lock().await.clone();
        items.sort_by_key(Ranked::order_index);
        items.iter().map(Ranked::id).collect()
    }

    pub async fn stored(&self, id: Uuid) -> Option<E> {
        self.items
            .lock()
            .await
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    fn check_writes(&self) -> Result<(), RepoError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepoError::from_persistence("connection reset"));
        }
        Ok(())
    }
}

#[async_trait]
impl<E: CollectionEntity> CollectionRepo<E> for MemoryCollection<E> {
    async fn list(&self) -> Result<Vec<E>, RepoError> {
        let mut items = self.items.lock().await.clone();
        items.sort_by_key(Ranked::order_index);
        Ok(items)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<E>, RepoError> {
        Ok(self.stored(id).await)
    }

    async fn create(&self, draft: E::Draft, order_index: i32) -> Result<E, RepoError> {
        self.calls.lock().await.push(Call::Create);
        self.check_writes()?;
        let record = E::materialize(Uuid::new_v4(), draft, order_index, OffsetDateTime::now_utc());
        self.items.lock().await.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: Uuid, patch: &E::Patch) -> Result<E, RepoError> {
        self.calls.lock().await.push(Call::Update(id));
        self.check_writes()?;
        let mut items = self.items.lock().await;
        let item = items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or(RepoError::NotFound)?;
        patch.apply(item);
        Ok(item.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.calls.lock().await.push(Call::Delete(id));
        self.check_writes()?;
        let mut items = self.items.lock().await;
        let index = items
            .iter()
            .position(|item| item.id() == id)
            .ok_or(RepoError::NotFound)?;
        let rank = items.remove(index).order_index();
        for item in items.iter_mut().filter(|item| item.order_index() > rank) {
            let shifted = item.order_index() - 1;
            item.set_order_index(shifted);
        }
        Ok(())
    }

    async fn reorder(&self, ids: &[Uuid]) -> Result<(), RepoError> {
        self.calls.lock().await.push(Call::Reorder(ids.to_vec()));
        if self.fail_reorder.load(Ordering::SeqCst) {
            return Err(RepoError::Timeout);
        }
        let mut items = self.items.lock().await;
        if ids.len() != items.len() {
            return Err(RepoError::integrity("stale identifier list"));
        }
        for (index, id) in ids.iter().enumerate() {
            let item = items
                .iter_mut()
                .find(|item| item.id() == *id)
                .ok_or_else(|| RepoError::integrity(format!("unknown identifier {id}")))?;
            item.set_order_index(i32::try_from(index + 1).expect("rank"));
        }
        Ok(())
    }
}

pub struct MemoryProfile {
    profile: Mutex<ProfileRecord>,
}

impl MemoryProfile {
    pub fn new(timezone: Tz) -> Arc<Self> {
        Arc::new(Self {
            profile: Mutex::new(ProfileRecord {
                display_name: "Ada Example".to_string(),
                headline: "Systems engineer".to_string(),
                bio: String::new(),
                avatar_url: None,
                location: None,
                email: None,
                resume_url: None,
                skills: Vec::new(),
                timezone,
                updated_at: OffsetDateTime::now_utc(),
            }),
        })
    }
}

#[async_trait]
impl ProfileRepo for MemoryProfile {
    async fn load_profile(&self) -> Result<ProfileRecord, RepoError> {
        Ok(self.profile.lock().await.clone())
    }

    async fn update_profile(
        &self,
        command: UpdateProfileCommand,
        timezone: Tz,
    ) -> Result<ProfileRecord, RepoError> {
        let mut profile = self.profile.lock().await;
        *profile = ProfileRecord {
            display_name: command.display_name,
            headline: command.headline,
            bio: command.bio,
            avatar_url: command.avatar_url,
            location: command.location,
            email: command.email,
            resume_url: command.resume_url,
            skills: command.skills,
            timezone,
            updated_at: OffsetDateTime::now_utc(),
        };
        Ok(profile.clone())
    }
}

#[derive(Default)]
pub struct MemoryClicks {
    clicks: Mutex<Vec<LinkClickRecord>>,
    fail: AtomicBool,
}

impl MemoryClicks {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub async fn recorded(&self) -> Vec<LinkClickRecord> {
        self.clicks.lock().await.clone()
    }

    pub async fn push(&self, link_id: Uuid, clicked_at: OffsetDateTime, visitor: &str) {
        self.clicks.lock().await.push(LinkClickRecord {
            id: Uuid::new_v4(),
            link_id,
            clicked_at,
            referrer: None,
            visitor_hash: Some(visitor.to_string()),
        });
    }
}

#[async_trait]
impl LinkClicksRepo for MemoryClicks {
    async fn record_click(&self, click: NewLinkClick) -> Result<LinkClickRecord, RepoError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(RepoError::Timeout);
        }
        let record = LinkClickRecord {
            id: Uuid::new_v4(),
            link_id: click.link_id,
            clicked_at: click.clicked_at,
            referrer: click.referrer,
            visitor_hash: click.visitor_hash,
        };
        self.clicks.lock().await.push(record.clone());
        Ok(record)
    }

    async fn list_clicks_since(
        &self,
        since: OffsetDateTime,
    ) -> Result<Vec<LinkClickRecord>, RepoError> {
        let mut clicks: Vec<_> = self
            .clicks
            .lock()
            .await
            .iter()
            .filter(|click| click.clicked_at >= since)
            .cloned()
            .collect();
        clicks.sort_by_key(|click| click.clicked_at);
        Ok(clicks)
    }
}

pub struct StaticHealth(pub bool);

#[async_trait]
impl HealthRepo for StaticHealth {
    async fn health_check(&self) -> Result<(), RepoError> {
        if self.0 {
            Ok(())
        } else {
            Err(RepoError::Timeout)
        }
    }
}

/// Every in-memory store behind one pair of listeners.
pub struct Fixture {
    pub profile: Arc<MemoryProfile>,
    pub projects: Arc<MemoryCollection<ProjectRecord>>,
    pub experiences: Arc<MemoryCollection<ExperienceRecord>>,
    pub hackathons: Arc<MemoryCollection<HackathonRecord>>,
    pub links: Arc<MemoryCollection<LinkRecord>>,
    pub clicks: Arc<MemoryClicks>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            profile: MemoryProfile::new(Tz::UTC),
            projects: MemoryCollection::new(),
            experiences: MemoryCollection::new(),
            hackathons: MemoryCollection::new(),
            links: MemoryCollection::new(),
            clicks: MemoryClicks::new(),
        }
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            health: Arc::new(StaticHealth(true)),
            profile: self.profile.clone(),
            projects: self.projects.clone(),
            experiences: self.experiences.clone(),
            hackathons: self.hackathons.clone(),
            links: self.links.clone(),
            clicks: self.clicks.clone(),
        }
    }

    pub fn states(&self) -> (HttpState, AdminState) {
        let public_url = Url::parse(PUBLIC_URL).expect("public url");
        build_states(&self.repositories(), AnalyticsWindow::default(), &public_url)
    }
}

pub fn link_draft(title: &str) -> LinkDraft {
    LinkDraft {
        title: title.to_string(),
        url: format!("https://example.com/{}", title.to_ascii_lowercase()),
        icon: None,
        active: true,
    }
}

pub fn project_draft(title: &str) -> ProjectDraft {
    ProjectDraft {
        title: title.to_string(),
        slug: Some(title.to_ascii_lowercase()),
        description: String::new(),
        technologies: vec!["Rust".to_string()],
        repository_url: None,
        live_url: None,
        image_url: None,
        featured: false,
        active: true,
    }
}
