use crate::application::error::{ErrorReport, HttpError};
use crate::application::portfolio::PortfolioSnapshot;
use crate::domain::{
    experiences::ExperienceRecord,
    hackathons::HackathonRecord,
    links::LinkRecord,
    profile::{ProfileRecord, SkillGroup},
    projects::ProjectRecord,
};
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

const MONTH_YEAR: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short] [year]");
const FULL_DATE: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none], [year]");

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Render the public error page and attach a report for the response logger.
pub fn render_error_response(
    source: &'static str,
    status: StatusCode,
    detail: impl Into<String>,
) -> Response {
    let view = ErrorPageView::for_status(status);
    let mut response = render_template_response(ErrorTemplate { view }, status);
    ErrorReport::from_message(source, status, detail).attach(&mut response);
    response
}

pub fn format_month(date: Date) -> String {
    date.format(MONTH_YEAR).unwrap_or_else(|_| date.to_string())
}

pub fn format_day(date: Date) -> String {
    date.format(FULL_DATE).unwrap_or_else(|_| date.to_string())
}

#[derive(Clone)]
pub struct ProfileView {
    pub name: String,
    pub headline: String,
    pub bio: String,
    pub avatar_url: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub resume_url: Option<String>,
    pub skills: Vec<SkillGroupView>,
}

#[derive(Clone)]
pub struct SkillGroupView {
    pub category: String,
    pub items: String,
}

impl From<&SkillGroup> for SkillGroupView {
    fn from(group: &SkillGroup) -> Self {
        Self {
            category: group.category.clone(),
            items: group.items.join(" · "),
        }
    }
}

impl From<&ProfileRecord> for ProfileView {
    fn from(profile: &ProfileRecord) -> Self {
        Self {
            name: profile.display_name.clone(),
            headline: profile.headline.clone(),
            bio: profile.bio.clone(),
            avatar_url: profile.avatar_url.clone(),
            location: profile.location.clone(),
            email: profile.email.clone(),
            resume_url: profile.resume_url.clone(),
            skills: profile.skills.iter().map(SkillGroupView::from).collect(),
        }
    }
}

#[derive(Clone)]
pub struct ProjectCardView {
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub repository_url: Option<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
}

impl From<&ProjectRecord> for ProjectCardView {
    fn from(project: &ProjectRecord) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            technologies: project.technologies.clone(),
            repository_url: project.repository_url.clone(),
            live_url: project.live_url.clone(),
            image_url: project.image_url.clone(),
        }
    }
}

#[derive(Clone)]
pub struct ExperienceView {
    pub company: String,
    pub role: String,
    pub location: Option<String>,
    pub description: String,
    pub technologies: Vec<String>,
    pub period: String,
}

impl From<&ExperienceRecord> for ExperienceView {
    fn from(experience: &ExperienceRecord) -> Self {
        let end = match experience.ended_on {
            Some(date) => format_month(date),
            None => "Present".to_string(),
        };
        Self {
            company: experience.company.clone(),
            role: experience.role.clone(),
            location: experience.location.clone(),
            description: experience.description.clone(),
            technologies: experience.technologies.clone(),
            period: format!("{} – {end}", format_month(experience.started_on)),
        }
    }
}

#[derive(Clone)]
pub struct PhotoView {
    pub url: String,
    pub caption: String,
}

#[derive(Clone)]
pub struct HackathonView {
    pub name: String,
    pub project_name: Option<String>,
    pub description: String,
    pub location: Option<String>,
    pub held_on: String,
    pub award: Option<String>,
    pub project_url: Option<String>,
    pub technologies: Vec<String>,
    pub photos: Vec<PhotoView>,
}

impl From<&HackathonRecord> for HackathonView {
    fn from(hackathon: &HackathonRecord) -> Self {
        Self {
            name: hackathon.name.clone(),
            project_name: hackathon.project_name.clone(),
            description: hackathon.description.clone(),
            location: hackathon.location.clone(),
            held_on: format_day(hackathon.held_on),
            award: hackathon.award.clone(),
            project_url: hackathon.project_url.clone(),
            technologies: hackathon.technologies.clone(),
            photos: hackathon
                .photos
                .iter()
                .map(|photo| PhotoView {
                    url: photo.url.clone(),
                    caption: photo.caption.clone().unwrap_or_default(),
                })
                .collect(),
        }
    }
}

pub struct PortfolioView {
    pub profile: ProfileView,
    pub featured: Vec<ProjectCardView>,
    pub projects: Vec<ProjectCardView>,
    pub experiences: Vec<ExperienceView>,
    pub hackathons: Vec<HackathonView>,
}

impl From<&PortfolioSnapshot> for PortfolioView {
    fn from(snapshot: &PortfolioSnapshot) -> Self {
        Self {
            profile: ProfileView::from(&snapshot.profile),
            featured: snapshot
                .featured_projects
                .iter()
                .map(ProjectCardView::from)
                .collect(),
            projects: snapshot
                .projects
                .iter()
                .filter(|project| !project.featured)
                .map(ProjectCardView::from)
                .collect(),
            experiences: snapshot
                .experiences
                .iter()
                .map(ExperienceView::from)
                .collect(),
            hackathons: snapshot.hackathons.iter().map(HackathonView::from).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "portfolio.html")]
pub struct PortfolioTemplate {
    pub view: PortfolioView,
}

#[derive(Clone)]
pub struct LinkButtonView {
    pub title: String,
    pub href: String,
    pub icon: String,
}

impl From<&LinkRecord> for LinkButtonView {
    fn from(link: &LinkRecord) -> Self {
        Self {
            title: link.title.clone(),
            href: format!("/l/{}", link.id),
            icon: link.icon.clone().unwrap_or_else(|| "link".to_string()),
        }
    }
}

pub struct LinksPageView {
    pub profile: ProfileView,
    pub links: Vec<LinkButtonView>,
}

impl LinksPageView {
    pub fn new(profile: &ProfileRecord, links: &[LinkRecord]) -> Self {
        Self {
            profile: ProfileView::from(profile),
            links: links.iter().map(LinkButtonView::from).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "links.html")]
pub struct LinksTemplate {
    pub view: LinksPageView,
}

pub struct ErrorPageView {
    pub status: u16,
    pub title: String,
    pub message: String,
}

impl ErrorPageView {
    pub fn for_status(status: StatusCode) -> Self {
        let (title, message) = match status {
            StatusCode::NOT_FOUND => (
                "Not found",
                "The page you were looking for does not exist.",
            ),
            StatusCode::SERVICE_UNAVAILABLE => (
                "Temporarily unavailable",
                "The site is having trouble reaching its database. Try again shortly.",
            ),
            _ => ("Something went wrong", "An unexpected error occurred."),
        };
        Self {
            status: status.as_u16(),
            title: title.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: ErrorPageView,
}
