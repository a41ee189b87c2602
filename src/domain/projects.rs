use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    collection::{
        CollectionEntity, EntityPatch, Ranked, blank_to_none, ensure_label,
        ensure_optional_web_url, ensure_tags, ensure_text, normalize_tags, nullable_field,
    },
    error::DomainError,
    slug::{derive_slug, generate_unique_slug},
    types::EntityKind,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub repository_url: Option<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
    pub featured: bool,
    pub active: bool,
    pub order_index: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub title: String,
    /// Derived from the title when absent.
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<Vec<String>>,
    #[serde(deserialize_with = "nullable_field")]
    pub repository_url: Option<Option<String>>,
    #[serde(deserialize_with = "nullable_field")]
    pub live_url: Option<Option<String>>,
    #[serde(deserialize_with = "nullable_field")]
    pub image_url: Option<Option<String>>,
    pub featured: Option<bool>,
    pub active: Option<bool>,
}

fn default_active() -> bool {
    true
}

impl Ranked for ProjectRecord {
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

impl CollectionEntity for ProjectRecord {
    type Draft = ProjectDraft;
    type Patch = ProjectPatch;

    const KIND: EntityKind = EntityKind::Project;

    fn label(&self) -> &str {
        &self.title
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn prepare_draft(draft: ProjectDraft, existing: &[Self]) -> Result<ProjectDraft, DomainError> {
        let title = draft.title.trim().to_string();
        ensure_label("title", &title)?;
        ensure_text("description", &draft.description)?;

        let taken = |candidate: &str| existing.iter().any(|project| project.slug == candidate);
        let slug = match blank_to_none(draft.slug) {
            Some(explicit) => {
                let slug = derive_slug(&explicit)
                    .map_err(|err| DomainError::validation("slug", err.to_string()))?;
                if taken(&slug) {
                    return Err(DomainError::validation("slug", "already in use"));
                }
                slug
            }
            None => generate_unique_slug(&title, |candidate| !taken(candidate))
                .map_err(|err| DomainError::validation("slug", err.to_string()))?,
        };

        let technologies = normalize_tags(draft.technologies);
        ensure_tags("technologies", &technologies)?;

        let repository_url = blank_to_none(draft.repository_url);
        let live_url = blank_to_none(draft.live_url);
        let image_url = blank_to_none(draft.image_url);
        ensure_optional_web_url("repository_url", repository_url.as_deref())?;
        ensure_optional_web_url("live_url", live_url.as_deref())?;
        ensure_optional_web_url("image_url", image_url.as_deref())?;

        Ok(ProjectDraft {
            title,
            slug: Some(slug),
            description: draft.description.trim().to_string(),
            technologies,
            repository_url,
            live_url,
            image_url,
            featured: draft.featured,
            active: draft.active,
        })
    }

    fn materialize(id: Uuid, draft: ProjectDraft, order_index: i32, now: OffsetDateTime) -> Self {
        Self {
            id,
            slug: draft.slug.unwrap_or_default(),
            title: draft.title,
            description: draft.description,
            technologies: draft.technologies,
            repository_url: draft.repository_url,
            live_url: draft.live_url,
            image_url: draft.image_url,
            featured: draft.featured,
            active: draft.active,
            order_index,
            created_at: now,
            updated_at: now,
        }
    }
}

impl EntityPatch<ProjectRecord> for ProjectPatch {
    fn prepare(self) -> Result<Self, DomainError> {
        let title = self.title.map(|value| value.trim().to_string());
        if let Some(title) = &title {
            ensure_label("title", title)?;
        }
        let slug = match self.slug {
            Some(raw) => Some(
                derive_slug(&raw).map_err(|err| DomainError::validation("slug", err.to_string()))?,
            ),
            None => None,
        };
        if let Some(description) = &self.description {
            ensure_text("description", description)?;
        }
        let technologies = self.technologies.map(normalize_tags);
        if let Some(technologies) = &technologies {
            ensure_tags("technologies", technologies)?;
        }
        let repository_url = self.repository_url.map(blank_to_none);
        let live_url = self.live_url.map(blank_to_none);
        let image_url = self.image_url.map(blank_to_none);
        ensure_optional_web_url("repository_url", repository_url.clone().flatten().as_deref())?;
        ensure_optional_web_url("live_url", live_url.clone().flatten().as_deref())?;
        ensure_optional_web_url("image_url", image_url.clone().flatten().as_deref())?;

        Ok(Self {
            title,
            slug,
            description: self.description.map(|value| value.trim().to_string()),
            technologies,
            repository_url,
            live_url,
            image_url,
            featured: self.featured,
            active: self.active,
        })
    }

    fn apply(&self, entity: &mut ProjectRecord) {
        if let Some(title) = &self.title {
            entity.title = title.clone();
        }
        if let Some(slug) = &self.slug {
            entity.slug = slug.clone();
        }
        if let Some(description) = &self.description {
            entity.description = description.clone();
        }
        if let Some(technologies) = &self.technologies {
            entity.technologies = technologies.clone();
        }
        if let Some(url) = &self.repository_url {
            entity.repository_url = url.clone();
        }
        if let Some(url) = &self.live_url {
            entity.live_url = url.clone();
        }
        if let Some(url) = &self.image_url {
            entity.image_url = url.clone();
        }
        if let Some(featured) = self.featured {
            entity.featured = featured;
        }
        if let Some(active) = self.active {
            entity.active = active;
        }
    }

    fn is_empty(&self) -> bool {
        self == &ProjectPatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> ProjectDraft {
        ProjectDraft {
            title: title.into(),
            slug: None,
            description: "A thing".into(),
            technologies: vec!["Rust".into(), " rust ".into()],
            repository_url: Some("https://github.com/example/thing".into()),
            live_url: Some("   ".into()),
            image_url: None,
            featured: false,
            active: true,
        }
    }

    #[test]
    fn prepare_draft_derives_unique_slug() {
        let now = OffsetDateTime::now_utc();
        let existing = vec![ProjectRecord::materialize(
            Uuid::new_v4(),
            ProjectRecord::prepare_draft(draft("Ray Tracer"), &[]).expect("first"),
            1,
            now,
        )];

        let prepared =
            ProjectRecord::prepare_draft(draft("Ray Tracer"), &existing).expect("second");

        assert_eq!(prepared.slug.as_deref(), Some("ray-tracer-2"));
        assert_eq!(prepared.live_url, None);
        assert_eq!(prepared.technologies, vec!["Rust".to_string(), "rust".to_string()]);
    }

    #[test]
    fn prepare_draft_rejects_bad_urls() {
        let mut bad = draft("Thing");
        bad.image_url = Some("ftp://example.com/a.png".into());

        let err = ProjectRecord::prepare_draft(bad, &[]).expect_err("invalid url");
        assert!(matches!(err, DomainError::Validation { field: "image_url", .. }));
    }

    #[test]
    fn patch_can_clear_nullable_fields() {
        let now = OffsetDateTime::now_utc();
        let prepared = ProjectRecord::prepare_draft(draft("Thing"), &[]).expect("draft");
        let mut record = ProjectRecord::materialize(Uuid::new_v4(), prepared, 1, now);

        let patch: ProjectPatch =
            serde_json::from_str(r#"{"repository_url": null}"#).expect("patch json");
        patch.prepare().expect("valid").apply(&mut record);

        assert_eq!(record.repository_url, None);
        assert_eq!(record.title, "Thing");
    }
}
