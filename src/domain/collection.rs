//! Traits shared by the four ordered collections and the field checks their
//! drafts and patches run before anything reaches storage.

use serde::{Deserialize, Deserializer};
use time::OffsetDateTime;
use url::Url;
use uuid::Uuid;

use super::{error::DomainError, types::EntityKind};

const MAX_TEXT_LEN: usize = 4_000;
const MAX_LABEL_LEN: usize = 200;
const MAX_TAGS: usize = 32;

/// Anything that occupies a rank inside an ordered collection.
pub trait Ranked {
    fn id(&self) -> Uuid;
    fn order_index(&self) -> i32;
    fn set_order_index(&mut self, value: i32);
}

/// A record type managed as an ordered, admin-editable collection.
pub trait CollectionEntity: Ranked + Clone + Send + Sync + 'static {
    /// Payload accepted on create.
    type Draft: Clone + Send + Sync + 'static;
    /// Partial payload accepted on update.
    type Patch: EntityPatch<Self> + Clone + Send + Sync + 'static;

    const KIND: EntityKind;

    /// Human readable label shown in admin lists.
    fn label(&self) -> &str;

    fn is_active(&self) -> bool;

    /// Normalize and validate a create payload against the current snapshot.
    fn prepare_draft(draft: Self::Draft, existing: &[Self]) -> Result<Self::Draft, DomainError>;

    /// Build a record from a validated draft once storage has assigned the
    /// identifier and timestamps.
    fn materialize(id: Uuid, draft: Self::Draft, order_index: i32, now: OffsetDateTime) -> Self;
}

/// A partial update. Absent fields are left untouched.
pub trait EntityPatch<E>: Sized {
    /// Normalize and validate the supplied fields.
    fn prepare(self) -> Result<Self, DomainError>;

    fn apply(&self, entity: &mut E);

    fn is_empty(&self) -> bool;
}

/// Deserialize a nullable patch field so that a missing key stays `None`
/// while an explicit `null` becomes `Some(None)`.
pub fn nullable_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub fn ensure_label(field: &'static str, value: &str) -> Result<(), DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    if trimmed.chars().count() > MAX_LABEL_LEN {
        return Err(DomainError::validation(
            field,
            format!("must be at most {MAX_LABEL_LEN} characters"),
        ));
    }
    Ok(())
}

pub fn ensure_text(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(DomainError::validation(
            field,
            format!("must be at most {MAX_TEXT_LEN} characters"),
        ));
    }
    Ok(())
}

/// Accept only absolute `http`/`https` URLs.
pub fn ensure_web_url(field: &'static str, value: &str) -> Result<(), DomainError> {
    let parsed = Url::parse(value.trim())
        .map_err(|err| DomainError::validation(field, format!("invalid url: {err}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(DomainError::validation(
            field,
            format!("unsupported scheme `{other}`"),
        )),
    }
}

pub fn ensure_optional_web_url(
    field: &'static str,
    value: Option<&str>,
) -> Result<(), DomainError> {
    match value {
        Some(url) => ensure_web_url(field, url),
        None => Ok(()),
    }
}

pub fn ensure_tags(field: &'static str, values: &[String]) -> Result<(), DomainError> {
    if values.len() > MAX_TAGS {
        return Err(DomainError::validation(
            field,
            format!("at most {MAX_TAGS} entries are allowed"),
        ));
    }
    for value in values {
        ensure_label(field, value)?;
    }
    Ok(())
}

/// Trim entries and drop empties and duplicates, keeping first occurrence.
pub fn normalize_tags(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() || out.iter().any(|existing| existing == trimmed) {
            continue;
        }
        out.push(trimmed.to_string());
    }
    out
}

/// Collapse blank optional strings to `None`.
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}
