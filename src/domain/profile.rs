//! The singleton profile shown in the portfolio hero and on the links page.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{
    collection::{
        blank_to_none, ensure_label, ensure_optional_web_url, ensure_tags, ensure_text,
        normalize_tags,
    },
    error::DomainError,
};

const MAX_SKILL_GROUPS: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub category: String,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub display_name: String,
    pub headline: String,
    pub bio: String,
    pub avatar_url: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub resume_url: Option<String>,
    pub skills: Vec<SkillGroup>,
    /// Zone used to bucket link clicks by local day.
    pub timezone: Tz,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Full replacement of the profile, as submitted by the settings form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateProfileCommand {
    pub display_name: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub skills: Vec<SkillGroup>,
    pub timezone: String,
}

impl UpdateProfileCommand {
    /// Normalize the command and resolve the timezone name.
    pub fn prepare(self) -> Result<(Self, Tz), DomainError> {
        let display_name = self.display_name.trim().to_string();
        ensure_label("display_name", &display_name)?;
        let headline = self.headline.trim().to_string();
        if !headline.is_empty() {
            ensure_label("headline", &headline)?;
        }
        ensure_text("bio", &self.bio)?;

        let avatar_url = blank_to_none(self.avatar_url);
        let resume_url = blank_to_none(self.resume_url);
        ensure_optional_web_url("avatar_url", avatar_url.as_deref())?;
        ensure_optional_web_url("resume_url", resume_url.as_deref())?;

        let email = blank_to_none(self.email);
        if let Some(email) = &email {
            ensure_email(email)?;
        }

        let location = blank_to_none(self.location);
        if let Some(location) = &location {
            ensure_label("location", location)?;
        }

        let skills = prepare_skills(self.skills)?;

        let timezone_name = self.timezone.trim().to_string();
        let timezone = timezone_name.parse::<Tz>().map_err(|_| {
            DomainError::validation("timezone", format!("unknown timezone `{timezone_name}`"))
        })?;

        Ok((
            Self {
                display_name,
                headline,
                bio: self.bio.trim().to_string(),
                avatar_url,
                location,
                email,
                resume_url,
                skills,
                timezone: timezone.name().to_string(),
            },
            timezone,
        ))
    }
}

impl From<&ProfileRecord> for UpdateProfileCommand {
    fn from(record: &ProfileRecord) -> Self {
        Self {
            display_name: record.display_name.clone(),
            headline: record.headline.clone(),
            bio: record.bio.clone(),
            avatar_url: record.avatar_url.clone(),
            location: record.location.clone(),
            email: record.email.clone(),
            resume_url: record.resume_url.clone(),
            skills: record.skills.clone(),
            timezone: record.timezone.name().to_string(),
        }
    }
}

fn ensure_email(value: &str) -> Result<(), DomainError> {
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(DomainError::validation("email", "invalid email address"))
    }
}

fn prepare_skills(groups: Vec<SkillGroup>) -> Result<Vec<SkillGroup>, DomainError> {
    if groups.len() > MAX_SKILL_GROUPS {
        return Err(DomainError::validation(
            "skills",
            format!("at most {MAX_SKILL_GROUPS} groups are allowed"),
        ));
    }
    groups
        .into_iter()
        .map(|group| {
            let category = group.category.trim().to_string();
            ensure_label("skills", &category)?;
            let items = normalize_tags(group.items);
            ensure_tags("skills", &items)?;
            Ok(SkillGroup { category, items })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> UpdateProfileCommand {
        UpdateProfileCommand {
            display_name: " Ada ".into(),
            headline: "Systems engineer".into(),
            bio: "Builds things.".into(),
            avatar_url: Some(String::new()),
            location: None,
            email: Some("ada@example.com".into()),
            resume_url: None,
            skills: vec![SkillGroup {
                category: "Languages".into(),
                items: vec!["Rust".into(), "Rust".into(), "Go".into()],
            }],
            timezone: "Europe/Berlin".into(),
        }
    }

    #[test]
    fn prepare_resolves_timezone_and_normalizes() {
        let (prepared, tz) = command().prepare().expect("valid");

        assert_eq!(tz, chrono_tz::Europe::Berlin);
        assert_eq!(prepared.display_name, "Ada");
        assert_eq!(prepared.avatar_url, None);
        assert_eq!(prepared.skills[0].items, vec!["Rust".to_string(), "Go".to_string()]);
    }

    #[test]
    fn prepare_rejects_unknown_timezone() {
        let mut bad = command();
        bad.timezone = "Mars/Olympus".into();

        let err = bad.prepare().expect_err("unknown tz");
        assert!(matches!(err, DomainError::Validation { field: "timezone", .. }));
    }

    #[test]
    fn prepare_rejects_malformed_email() {
        for email in ["ada", "ada@", "@example.com", "ada@example", "a da@example.com"] {
            let mut bad = command();
            bad.email = Some(email.into());
            assert!(bad.prepare().is_err(), "{email} should be rejected");
        }
    }
}
