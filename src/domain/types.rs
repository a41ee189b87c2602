//! Shared domain enumerations.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The four ordered collections managed from the admin surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Project,
    Experience,
    Hackathon,
    Link,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Project,
        EntityKind::Experience,
        EntityKind::Hackathon,
        EntityKind::Link,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Project => "project",
            EntityKind::Experience => "experience",
            EntityKind::Hackathon => "hackathon",
            EntityKind::Link => "link",
        }
    }

    /// Path segment used by the admin surface (`/projects`, `/links`, ...).
    pub fn collection_path(self) -> &'static str {
        match self {
            EntityKind::Project => "projects",
            EntityKind::Experience => "experiences",
            EntityKind::Hackathon => "hackathons",
            EntityKind::Link => "links",
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            EntityKind::Project => "projects",
            EntityKind::Experience => "experiences",
            EntityKind::Hackathon => "hackathons",
            EntityKind::Link => "links",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            EntityKind::Project => "Projects",
            EntityKind::Experience => "Experience",
            EntityKind::Hackathon => "Hackathons",
            EntityKind::Link => "Links",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown collection `{0}`")]
pub struct UnknownEntityKind(pub String);

impl FromStr for EntityKind {
    type Err = UnknownEntityKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value || kind.collection_path() == value)
            .ok_or_else(|| UnknownEntityKind(value.to_string()))
    }
}
