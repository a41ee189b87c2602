use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::{
    collection::{
        CollectionEntity, EntityPatch, Ranked, blank_to_none, ensure_label,
        ensure_optional_web_url, ensure_tags, ensure_text, ensure_web_url, normalize_tags,
        nullable_field,
    },
    dates::{iso_date, optional_date},
    error::DomainError,
    types::EntityKind,
};

const MAX_PHOTOS: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HackathonPhoto {
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HackathonRecord {
    pub id: Uuid,
    pub name: String,
    pub project_name: Option<String>,
    pub description: String,
    pub location: Option<String>,
    #[serde(with = "iso_date")]
    pub held_on: Date,
    pub award: Option<String>,
    pub project_url: Option<String>,
    pub technologies: Vec<String>,
    pub photos: Vec<HackathonPhoto>,
    pub active: bool,
    pub order_index: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HackathonDraft {
    pub name: String,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(with = "iso_date")]
    pub held_on: Date,
    #[serde(default)]
    pub award: Option<String>,
    #[serde(default)]
    pub project_url: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub photos: Vec<HackathonPhoto>,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HackathonPatch {
    pub name: Option<String>,
    #[serde(deserialize_with = "nullable_field")]
    pub project_name: Option<Option<String>>,
    pub description: Option<String>,
    #[serde(deserialize_with = "nullable_field")]
    pub location: Option<Option<String>>,
    #[serde(deserialize_with = "optional_date")]
    pub held_on: Option<Date>,
    #[serde(deserialize_with = "nullable_field")]
    pub award: Option<Option<String>>,
    #[serde(deserialize_with = "nullable_field")]
    pub project_url: Option<Option<String>>,
    pub technologies: Option<Vec<String>>,
    pub photos: Option<Vec<HackathonPhoto>>,
    pub active: Option<bool>,
}

fn default_active() -> bool {
    true
}

fn optional_label(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<String>, DomainError> {
    let value = blank_to_none(value);
    if let Some(value) = &value {
        ensure_label(field, value)?;
    }
    Ok(value)
}

fn prepare_photos(photos: Vec<HackathonPhoto>) -> Result<Vec<HackathonPhoto>, DomainError> {
    if photos.len() > MAX_PHOTOS {
        return Err(DomainError::validation(
            "photos",
            format!("at most {MAX_PHOTOS} photos are allowed"),
        ));
    }
    photos
        .into_iter()
        .map(|photo| {
            let url = photo.url.trim().to_string();
            ensure_web_url("photos", &url)?;
            Ok(HackathonPhoto {
                url,
                caption: optional_label("photos", photo.caption)?,
            })
        })
        .collect()
}

impl Ranked for HackathonRecord {
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

impl CollectionEntity for HackathonRecord {
    type Draft = HackathonDraft;
    type Patch = HackathonPatch;

    const KIND: EntityKind = EntityKind::Hackathon;

    fn label(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn prepare_draft(
        draft: HackathonDraft,
        _existing: &[Self],
    ) -> Result<HackathonDraft, DomainError> {
        let name = draft.name.trim().to_string();
        ensure_label("name", &name)?;
        ensure_text("description", &draft.description)?;

        let project_url = blank_to_none(draft.project_url);
        ensure_optional_web_url("project_url", project_url.as_deref())?;
        let technologies = normalize_tags(draft.technologies);
        ensure_tags("technologies", &technologies)?;

        Ok(HackathonDraft {
            name,
            project_name: optional_label("project_name", draft.project_name)?,
            description: draft.description.trim().to_string(),
            location: optional_label("location", draft.location)?,
            held_on: draft.held_on,
            award: optional_label("award", draft.award)?,
            project_url,
            technologies,
            photos: prepare_photos(draft.photos)?,
            active: draft.active,
        })
    }

    fn materialize(
        id: Uuid,
        draft: HackathonDraft,
        order_index: i32,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            name: draft.name,
            project_name: draft.project_name,
            description: draft.description,
            location: draft.location,
            held_on: draft.held_on,
            award: draft.award,
            project_url: draft.project_url,
            technologies: draft.technologies,
            photos: draft.photos,
            active: draft.active,
            order_index,
            created_at: now,
            updated_at: now,
        }
    }
}

impl EntityPatch<HackathonRecord> for HackathonPatch {
    fn prepare(self) -> Result<Self, DomainError> {
        let name = self.name.map(|value| value.trim().to_string());
        if let Some(name) = &name {
            ensure_label("name", name)?;
        }
        if let Some(description) = &self.description {
            ensure_text("description", description)?;
        }
        let project_url = self.project_url.map(blank_to_none);
        ensure_optional_web_url("project_url", project_url.clone().flatten().as_deref())?;
        let technologies = self.technologies.map(normalize_tags);
        if let Some(technologies) = &technologies {
            ensure_tags("technologies", technologies)?;
        }

        Ok(Self {
            name,
            project_name: self
                .project_name
                .map(|value| optional_label("project_name", value))
                .transpose()?,
            description: self.description.map(|value| value.trim().to_string()),
            location: self
                .location
                .map(|value| optional_label("location", value))
                .transpose()?,
            held_on: self.held_on,
            award: self
                .award
                .map(|value| optional_label("award", value))
                .transpose()?,
            project_url,
            technologies,
            photos: self.photos.map(prepare_photos).transpose()?,
            active: self.active,
        })
    }

    fn apply(&self, entity: &mut HackathonRecord) {
        if let Some(name) = &self.name {
            entity.name = name.clone();
        }
        if let Some(project_name) = &self.project_name {
            entity.project_name = project_name.clone();
        }
        if let Some(description) = &self.description {
            entity.description = description.clone();
        }
        if let Some(location) = &self.location {
            entity.location = location.clone();
        }
        if let Some(held_on) = self.held_on {
            entity.held_on = held_on;
        }
        if let Some(award) = &self.award {
            entity.award = award.clone();
        }
        if let Some(project_url) = &self.project_url {
            entity.project_url = project_url.clone();
        }
        if let Some(technologies) = &self.technologies {
            entity.technologies = technologies.clone();
        }
        if let Some(photos) = &self.photos {
            entity.photos = photos.clone();
        }
        if let Some(active) = self.active {
            entity.active = active;
        }
    }

    fn is_empty(&self) -> bool {
        self == &HackathonPatch::default()
    }
}
