use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use uuid::Uuid;

const MAX_REFERRER_LEN: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkClickRecord {
    pub id: Uuid,
    pub link_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub clicked_at: OffsetDateTime,
    pub referrer: Option<String>,
    pub visitor_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLinkClick {
    pub link_id: Uuid,
    pub clicked_at: OffsetDateTime,
    pub referrer: Option<String>,
    pub visitor_hash: Option<String>,
}

impl NewLinkClick {
    pub fn new(
        link_id: Uuid,
        clicked_at: OffsetDateTime,
        referrer: Option<&str>,
        visitor_hash: Option<String>,
    ) -> Self {
        Self {
            link_id,
            clicked_at,
            referrer: referrer.and_then(clamp_referrer),
            visitor_hash,
        }
    }
}

fn clamp_referrer(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_REFERRER_LEN).collect())
}

/// Hex SHA-256 over the client address and user agent. Raw addresses never
/// reach storage.
pub fn visitor_hash(client: Option<&str>, user_agent: Option<&str>) -> Option<String> {
    if client.is_none() && user_agent.is_none() {
        return None;
    }
    let mut hasher = Sha256::new();
    hasher.update(client.unwrap_or_default().as_bytes());
    hasher.update([0u8]);
    hasher.update(user_agent.unwrap_or_default().as_bytes());
    Some(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visitor_hash_is_stable_and_opaque() {
        let first = visitor_hash(Some("203.0.113.7"), Some("curl/8")).expect("hash");
        let second = visitor_hash(Some("203.0.113.7"), Some("curl/8")).expect("hash");

        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(!first.contains("203.0.113.7"));
        assert_ne!(first, visitor_hash(Some("203.0.113.8"), Some("curl/8")).expect("hash"));
    }

    #[test]
    fn visitor_hash_needs_some_input() {
        assert_eq!(visitor_hash(None, None), None);
    }

    #[test]
    fn blank_referrer_is_dropped() {
        let click = NewLinkClick::new(Uuid::new_v4(), OffsetDateTime::now_utc(), Some("  "), None);
        assert_eq!(click.referrer, None);
    }
}
