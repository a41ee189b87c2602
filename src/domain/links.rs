use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    collection::{
        CollectionEntity, EntityPatch, Ranked, blank_to_none, ensure_label, ensure_web_url,
        nullable_field,
    },
    error::DomainError,
    types::EntityKind,
};

const MAX_ICON_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    /// Icon identifier understood by the links page (e.g. `github`).
    pub icon: Option<String>,
    pub active: bool,
    pub order_index: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkDraft {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LinkPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    #[serde(deserialize_with = "nullable_field")]
    pub icon: Option<Option<String>>,
    pub active: Option<bool>,
}

fn default_active() -> bool {
    true
}

fn prepare_icon(icon: Option<String>) -> Result<Option<String>, DomainError> {
    let icon = blank_to_none(icon).map(|value| value.to_ascii_lowercase());
    if let Some(icon) = &icon {
        let valid = icon.len() <= MAX_ICON_LEN
            && icon
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
        if !valid {
            return Err(DomainError::validation(
                "icon",
                "use letters, digits, `-` or `_`",
            ));
        }
    }
    Ok(icon)
}

impl Ranked for LinkRecord {
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

impl CollectionEntity for LinkRecord {
    type Draft = LinkDraft;
    type Patch = LinkPatch;

    const KIND: EntityKind = EntityKind::Link;

    fn label(&self) -> &str {
        &self.title
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn prepare_draft(draft: LinkDraft, _existing: &[Self]) -> Result<LinkDraft, DomainError> {
        let title = draft.title.trim().to_string();
        let url = draft.url.trim().to_string();
        ensure_label("title", &title)?;
        ensure_web_url("url", &url)?;

        Ok(LinkDraft {
            title,
            url,
            icon: prepare_icon(draft.icon)?,
            active: draft.active,
        })
    }

    fn materialize(id: Uuid, draft: LinkDraft, order_index: i32, now: OffsetDateTime) -> Self {
        Self {
            id,
            title: draft.title,
            url: draft.url,
            icon: draft.icon,
            active: draft.active,
            order_index,
            created_at: now,
            updated_at: now,
        }
    }
}

impl EntityPatch<LinkRecord> for LinkPatch {
    fn prepare(self) -> Result<Self, DomainError> {
        let title = self.title.map(|value| value.trim().to_string());
        if let Some(title) = &title {
            ensure_label("title", title)?;
        }
        let url = self.url.map(|value| value.trim().to_string());
        if let Some(url) = &url {
            ensure_web_url("url", url)?;
        }

        Ok(Self {
            title,
            url,
            icon: self.icon.map(prepare_icon).transpose()?,
            active: self.active,
        })
    }

    fn apply(&self, entity: &mut LinkRecord) {
        if let Some(title) = &self.title {
            entity.title = title.clone();
        }
        if let Some(url) = &self.url {
            entity.url = url.clone();
        }
        if let Some(icon) = &self.icon {
            entity.icon = icon.clone();
        }
        if let Some(active) = self.active {
            entity.active = active;
        }
    }

    fn is_empty(&self) -> bool {
        self == &LinkPatch::default()
    }
}
