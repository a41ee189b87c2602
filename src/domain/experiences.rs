use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::{
    collection::{
        CollectionEntity, EntityPatch, Ranked, blank_to_none, ensure_label, ensure_tags,
        ensure_text, normalize_tags, nullable_field,
    },
    dates::{iso_date, nullable_date, optional_date},
    error::DomainError,
    types::EntityKind,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRecord {
    pub id: Uuid,
    pub company: String,
    pub role: String,
    pub location: Option<String>,
    pub description: String,
    pub technologies: Vec<String>,
    #[serde(with = "iso_date")]
    pub started_on: Date,
    /// `None` while the position is current.
    #[serde(with = "iso_date::option")]
    pub ended_on: Option<Date>,
    pub active: bool,
    pub order_index: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl ExperienceRecord {
    pub fn is_current(&self) -> bool {
        self.ended_on.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceDraft {
    pub company: String,
    pub role: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(with = "iso_date")]
    pub started_on: Date,
    #[serde(default, with = "iso_date::option")]
    pub ended_on: Option<Date>,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExperiencePatch {
    pub company: Option<String>,
    pub role: Option<String>,
    #[serde(deserialize_with = "nullable_field")]
    pub location: Option<Option<String>>,
    pub description: Option<String>,
    pub technologies: Option<Vec<String>>,
    #[serde(deserialize_with = "optional_date")]
    pub started_on: Option<Date>,
    #[serde(deserialize_with = "nullable_date")]
    pub ended_on: Option<Option<Date>>,
    pub active: Option<bool>,
}

fn default_active() -> bool {
    true
}

fn ensure_period(started_on: Date, ended_on: Option<Date>) -> Result<(), DomainError> {
    match ended_on {
        Some(ended_on) if ended_on < started_on => Err(DomainError::validation(
            "ended_on",
            "must not be earlier than started_on",
        )),
        _ => Ok(()),
    }
}

impl Ranked for ExperienceRecord {
    fn id(&self) -> Uuid {
        self.id
    }

    fn order_index(&self) -> i32 {
        self.order_index
    }

    fn set_order_index(&mut self, value: i32) {
        self.order_index = value;
    }
}

impl CollectionEntity for ExperienceRecord {
    type Draft = ExperienceDraft;
    type Patch = ExperiencePatch;

    const KIND: EntityKind = EntityKind::Experience;

    fn label(&self) -> &str {
        &self.company
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn prepare_draft(
        draft: ExperienceDraft,
        _existing: &[Self],
    ) -> Result<ExperienceDraft, DomainError> {
        let company = draft.company.trim().to_string();
        let role = draft.role.trim().to_string();
        ensure_label("company", &company)?;
        ensure_label("role", &role)?;
        ensure_text("description", &draft.description)?;
        ensure_period(draft.started_on, draft.ended_on)?;

        let location = blank_to_none(draft.location);
        if let Some(location) = &location {
            ensure_label("location", location)?;
        }
        let technologies = normalize_tags(draft.technologies);
        ensure_tags("technologies", &technologies)?;

        Ok(ExperienceDraft {
            company,
            role,
            location,
            description: draft.description.trim().to_string(),
            technologies,
            started_on: draft.started_on,
            ended_on: draft.ended_on,
            active: draft.active,
        })
    }

    fn materialize(
        id: Uuid,
        draft: ExperienceDraft,
        order_index: i32,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            company: draft.company,
            role: draft.role,
            location: draft.location,
            description: draft.description,
            technologies: draft.technologies,
            started_on: draft.started_on,
            ended_on: draft.ended_on,
            active: draft.active,
            order_index,
            created_at: now,
            updated_at: now,
        }
    }
}

impl EntityPatch<ExperienceRecord> for ExperiencePatch {
    fn prepare(self) -> Result<Self, DomainError> {
        let company = self.company.map(|value| value.trim().to_string());
        let role = self.role.map(|value| value.trim().to_string());
        if let Some(company) = &company {
            ensure_label("company", company)?;
        }
        if let Some(role) = &role {
            ensure_label("role", role)?;
        }
        if let Some(description) = &self.description {
            ensure_text("description", description)?;
        }
        // Only checkable here when both ends arrive together; storage
        // enforces the rest through a CHECK constraint.
        if let (Some(started_on), Some(ended_on)) = (self.started_on, self.ended_on) {
            ensure_period(started_on, ended_on)?;
        }
        let location = self.location.map(blank_to_none);
        if let Some(Some(location)) = &location {
            ensure_label("location", location)?;
        }
        let technologies = self.technologies.map(normalize_tags);
        if let Some(technologies) = &technologies {
            ensure_tags("technologies", technologies)?;
        }

        Ok(Self {
            company,
            role,
            location,
            description: self.description.map(|value| value.trim().to_string()),
            technologies,
            started_on: self.started_on,
            ended_on: self.ended_on,
            active: self.active,
        })
    }

    fn apply(&self, entity: &mut ExperienceRecord) {
        if let Some(company) = &self.company {
            entity.company = company.clone();
        }
        if let Some(role) = &self.role {
            entity.role = role.clone();
        }
        if let Some(location) = &self.location {
            entity.location = location.clone();
        }
        if let Some(description) = &self.description {
            entity.description = description.clone();
        }
        if let Some(technologies) = &self.technologies {
            entity.technologies = technologies.clone();
        }
        if let Some(started_on) = self.started_on {
            entity.started_on = started_on;
        }
        if let Some(ended_on) = self.ended_on {
            entity.ended_on = ended_on;
        }
        if let Some(active) = self.active {
            entity.active = active;
        }
    }

    fn is_empty(&self) -> bool {
        self == &ExperiencePatch::default()
    }
}
