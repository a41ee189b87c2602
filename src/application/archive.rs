//! Import/export of portfolio content as a TOML archive.
//!
//! Collections are written in display order; import restores that order by
//! assigning ranks `1..=N` in file order.

use std::{fs, path::Path, sync::Arc};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::{
    application::repos::{
        CollectionRepo, ContentImportRepo, ContentReplacement, ProfileRepo, RepoError,
    },
    domain::{
        collection::CollectionEntity,
        error::DomainError,
        experiences::{ExperienceDraft, ExperienceRecord},
        hackathons::{HackathonDraft, HackathonRecord},
        links::{LinkDraft, LinkRecord},
        profile::UpdateProfileCommand,
        projects::{ProjectDraft, ProjectRecord},
    },
};

const ARCHIVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode archive: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("invalid archive: {0}")]
    Decode(#[from] toml::de::Error),
    #[error("unsupported archive version {0}")]
    UnsupportedVersion(u32),
    #[error("archive entry {index} of `{section}` is invalid: {source}")]
    Invalid {
        section: &'static str,
        index: usize,
        #[source]
        source: DomainError,
    },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioArchive {
    pub version: u32,
    #[serde(default)]
    pub profile: Option<UpdateProfileCommand>,
    #[serde(default)]
    pub projects: Vec<ProjectDraft>,
    #[serde(default)]
    pub experiences: Vec<ExperienceDraft>,
    #[serde(default)]
    pub hackathons: Vec<HackathonDraft>,
    #[serde(default)]
    pub links: Vec<LinkDraft>,
}

impl PortfolioArchive {
    pub fn to_toml(&self) -> Result<String, ArchiveError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn from_toml(data: &str) -> Result<Self, ArchiveError> {
        let archive: PortfolioArchive = toml::from_str(data)?;
        if archive.version != ARCHIVE_VERSION {
            return Err(ArchiveError::UnsupportedVersion(archive.version));
        }
        Ok(archive)
    }
}

/// Read handles needed to assemble an archive.
#[derive(Clone)]
pub struct ArchiveSources {
    pub profile: Arc<dyn ProfileRepo>,
    pub projects: Arc<dyn CollectionRepo<ProjectRecord>>,
    pub experiences: Arc<dyn CollectionRepo<ExperienceRecord>>,
    pub hackathons: Arc<dyn CollectionRepo<HackathonRecord>>,
    pub links: Arc<dyn CollectionRepo<LinkRecord>>,
}

pub async fn gather_archive(sources: &ArchiveSources) -> Result<PortfolioArchive, ArchiveError> {
    let (profile, projects, experiences, hackathons, links) = tokio::try_join!(
        sources.profile.load_profile(),
        sources.projects.list(),
        sources.experiences.list(),
        sources.hackathons.list(),
        sources.links.list()
    )?;

    Ok(PortfolioArchive {
        version: ARCHIVE_VERSION,
        profile: Some(UpdateProfileCommand::from(&profile)),
        projects: projects.iter().map(project_draft).collect(),
        experiences: experiences.iter().map(experience_draft).collect(),
        hackathons: hackathons.iter().map(hackathon_draft).collect(),
        links: links.iter().map(link_draft).collect(),
    })
}

/// Export the current content to `path`.
pub async fn export_archive(sources: &ArchiveSources, path: &Path) -> Result<(), ArchiveError> {
    let archive = gather_archive(sources).await?;
    fs::write(path, archive.to_toml()?)?;
    info!(
        target: "folio::archive",
        path = %path.display(),
        projects = archive.projects.len(),
        experiences = archive.experiences.len(),
        hackathons = archive.hackathons.len(),
        links = archive.links.len(),
        "archive exported"
    );
    Ok(())
}

/// Validate every entry and build the replacement handed to storage.
pub fn prepare_import(archive: PortfolioArchive) -> Result<ContentReplacement, ArchiveError> {
    let profile = archive
        .profile
        .map(|command| {
            command.prepare().map_err(|source| ArchiveError::Invalid {
                section: "profile",
                index: 0,
                source,
            })
        })
        .transpose()?;

    Ok(ContentReplacement {
        profile,
        projects: prepare_section::<ProjectRecord>("projects", archive.projects)?,
        experiences: prepare_section::<ExperienceRecord>("experiences", archive.experiences)?,
        hackathons: prepare_section::<HackathonRecord>("hackathons", archive.hackathons)?,
        links: prepare_section::<LinkRecord>("links", archive.links)?,
    })
}

/// Replace all content with the archive at `path`.
pub async fn import_archive(
    target: &dyn ContentImportRepo,
    path: &Path,
) -> Result<(), ArchiveError> {
    let data = fs::read_to_string(path)?;
    let content = prepare_import(PortfolioArchive::from_toml(&data)?)?;
    let (projects, experiences, hackathons, links) = (
        content.projects.len(),
        content.experiences.len(),
        content.hackathons.len(),
        content.links.len(),
    );

    target.replace_content(content).await?;

    info!(
        target: "folio::archive",
        path = %path.display(),
        projects,
        experiences,
        hackathons,
        links,
        "archive imported"
    );
    Ok(())
}

/// Run each draft through the same checks as the admin surface, against the
/// entries already accepted from this section.
fn prepare_section<E: CollectionEntity>(
    section: &'static str,
    drafts: Vec<E::Draft>,
) -> Result<Vec<E::Draft>, ArchiveError> {
    let mut accepted: Vec<E> = Vec::with_capacity(drafts.len());
    let mut out = Vec::with_capacity(drafts.len());
    for (index, draft) in drafts.into_iter().enumerate() {
        let prepared = E::prepare_draft(draft, &accepted).map_err(|source| {
            ArchiveError::Invalid {
                section,
                index,
                source,
            }
        })?;
        let rank = i32::try_from(index + 1).unwrap_or(i32::MAX);
        accepted.push(E::materialize(
            Uuid::nil(),
            prepared.clone(),
            rank,
            OffsetDateTime::UNIX_EPOCH,
        ));
        out.push(prepared);
    }
    Ok(out)
}

fn project_draft(record: &ProjectRecord) -> ProjectDraft {
    ProjectDraft {
        title: record.title.clone(),
        slug: Some(record.slug.clone()),
        description: record.description.clone(),
        technologies: record.technologies.clone(),
        repository_url: record.repository_url.clone(),
        live_url: record.live_url.clone(),
        image_url: record.image_url.clone(),
        featured: record.featured,
        active: record.active,
    }
}

fn experience_draft(record: &ExperienceRecord) -> ExperienceDraft {
    ExperienceDraft {
        company: record.company.clone(),
        role: record.role.clone(),
        location: record.location.clone(),
        description: record.description.clone(),
        technologies: record.technologies.clone(),
        started_on: record.started_on,
        ended_on: record.ended_on,
        active: record.active,
    }
}

fn hackathon_draft(record: &HackathonRecord) -> HackathonDraft {
    HackathonDraft {
        name: record.name.clone(),
        project_name: record.project_name.clone(),
        description: record.description.clone(),
        location: record.location.clone(),
        held_on: record.held_on,
        award: record.award.clone(),
        project_url: record.project_url.clone(),
        technologies: record.technologies.clone(),
        photos: record.photos.clone(),
        active: record.active,
    }
}

fn link_draft(record: &LinkRecord) -> LinkDraft {
    LinkDraft {
        title: record.title.clone(),
        url: record.url.clone(),
        icon: record.icon.clone(),
        active: record.active,
    }
}
