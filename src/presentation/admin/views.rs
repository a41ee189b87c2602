use askama::Template;
use uuid::Uuid;

use crate::application::admin::dashboard::DashboardSnapshot;
use crate::domain::{
    analytics::ClickSummary, collection::CollectionEntity, experiences::ExperienceRecord,
    hackathons::HackathonRecord, links::LinkRecord, projects::ProjectRecord, types::EntityKind,
};
use crate::presentation::views::{format_day, format_month};

#[derive(Clone)]
pub struct AdminNavigationItemView {
    pub label: String,
    pub href: String,
    pub is_active: bool,
    pub open_in_new_tab: bool,
}

#[derive(Clone)]
pub struct AdminChrome {
    pub title: String,
    pub navigation: Vec<AdminNavigationItemView>,
}

impl AdminChrome {
    /// Navigation with the entry for `active_path` highlighted, closed by a
    /// link to the public links page that opens in a new tab.
    pub fn new(active_path: &str, public_links_url: &str) -> Self {
        let mut navigation = vec![AdminNavigationItemView {
            label: "Dashboard".to_string(),
            href: "/".to_string(),
            is_active: active_path == "/",
            open_in_new_tab: false,
        }];
        navigation.extend(EntityKind::ALL.into_iter().map(|kind| {
            let href = format!("/{}", kind.collection_path());
            AdminNavigationItemView {
                label: kind.heading().to_string(),
                is_active: href == active_path,
                href,
                open_in_new_tab: false,
            }
        }));
        navigation.push(AdminNavigationItemView {
            label: "Public links".to_string(),
            href: public_links_url.to_string(),
            is_active: false,
            open_in_new_tab: true,
        });

        Self {
            title: "folio admin".to_string(),
            navigation,
        }
    }
}

#[derive(Clone)]
pub struct AdminLayout<T> {
    pub chrome: AdminChrome,
    pub content: T,
}

impl<T> AdminLayout<T> {
    pub fn new(chrome: AdminChrome, content: T) -> Self {
        Self { chrome, content }
    }
}

/// Presentation hooks for records listed in a collection manager.
pub trait ManagedRecord: CollectionEntity {
    /// Example create payload prefilled in the manager form.
    const DRAFT_EXAMPLE: &'static str;

    /// Secondary line shown under the label.
    fn caption(&self) -> String;
}

impl ManagedRecord for ProjectRecord {
    const DRAFT_EXAMPLE: &'static str = r#"{
  "title": "New project",
  "description": "",
  "technologies": ["Rust"],
  "repository_url": null,
  "live_url": null,
  "image_url": null,
  "featured": false,
  "active": true
}"#;

    fn caption(&self) -> String {
        let mut parts = vec![format!("/{}", self.slug)];
        if self.featured {
            parts.push("featured".to_string());
        }
        if !self.technologies.is_empty() {
            parts.push(self.technologies.join(", "));
        }
        parts.join(" · ")
    }
}

impl ManagedRecord for ExperienceRecord {
    const DRAFT_EXAMPLE: &'static str = r#"{
  "company": "Company",
  "role": "Role",
  "location": null,
  "description": "",
  "technologies": [],
  "started_on": "2024-01-01",
  "ended_on": null,
  "active": true
}"#;

    fn caption(&self) -> String {
        let end = match self.ended_on {
            Some(date) => format_month(date),
            None => "present".to_string(),
        };
        format!("{} · {} – {end}", self.role, format_month(self.started_on))
    }
}

impl ManagedRecord for HackathonRecord {
    const DRAFT_EXAMPLE: &'static str = r#"{
  "name": "Hackathon",
  "project_name": null,
  "description": "",
  "location": null,
  "held_on": "2024-01-01",
  "award": null,
  "project_url": null,
  "technologies": [],
  "photos": [],
  "active": true
}"#;

    fn caption(&self) -> String {
        let mut caption = format_day(self.held_on);
        if let Some(award) = self.award.as_deref() {
            caption.push_str(" · ");
            caption.push_str(award);
        }
        caption
    }
}

impl ManagedRecord for LinkRecord {
    const DRAFT_EXAMPLE: &'static str = r#"{
  "title": "GitHub",
  "url": "https://github.com/",
  "icon": "github",
  "active": true
}"#;

    fn caption(&self) -> String {
        self.url.clone()
    }
}

#[derive(Clone)]
pub struct ManagerRowView {
    pub id: String,
    pub label: String,
    pub caption: String,
    pub active: bool,
    pub position: usize,
}

impl ManagerRowView {
    /// `position` is one-based.
    pub fn new<E: ManagedRecord>(item: &E, position: usize) -> Self {
        Self {
            id: item.id().to_string(),
            label: item.label().to_string(),
            caption: item.caption(),
            active: item.is_active(),
            position,
        }
    }
}

pub struct CollectionPageView {
    pub heading: String,
    pub api_base: String,
    pub rows_base: String,
    pub draft_example: String,
    pub rows: Vec<ManagerRowView>,
}

impl CollectionPageView {
    pub fn new<E: ManagedRecord>(items: &[E]) -> Self {
        let rows = items
            .iter()
            .enumerate()
            .map(|(index, item)| ManagerRowView::new(item, index + 1))
            .collect();

        Self {
            heading: E::KIND.heading().to_string(),
            api_base: format!("/api/{}", E::KIND.collection_path()),
            rows_base: format!("/{}/rows", E::KIND.collection_path()),
            draft_example: E::DRAFT_EXAMPLE.to_string(),
            rows,
        }
    }
}

#[derive(Template)]
#[template(path = "admin/collection.html")]
pub struct AdminCollectionTemplate {
    pub view: AdminLayout<CollectionPageView>,
}

/// A single manager row, swapped into the list after a create or an edit.
#[derive(Template)]
#[template(path = "admin/row.html")]
pub struct AdminRowTemplate {
    pub row: ManagerRowView,
}

#[derive(Clone)]
pub struct CountCardView {
    pub heading: String,
    pub href: String,
    pub total: u64,
    pub active: u64,
}

#[derive(Clone)]
pub struct DailyBarView {
    pub date: String,
    pub clicks: u64,
    /// Bar width relative to the busiest day, 0..=100.
    pub percent: u64,
}

#[derive(Clone)]
pub struct LinkClicksView {
    pub title: String,
    pub link_id: Uuid,
    pub clicks: u64,
}

pub struct DashboardView {
    pub counts: Vec<CountCardView>,
    pub window_days: u32,
    pub timezone: String,
    pub total_clicks: u64,
    pub unique_visitors: u64,
    pub top_link: Option<String>,
    pub daily: Vec<DailyBarView>,
    pub by_link: Vec<LinkClicksView>,
}

impl From<&DashboardSnapshot> for DashboardView {
    fn from(snapshot: &DashboardSnapshot) -> Self {
        let counts = snapshot
            .collections
            .iter()
            .map(|count| CountCardView {
                heading: count.kind.heading().to_string(),
                href: format!("/{}", count.kind.collection_path()),
                total: count.total,
                active: count.active,
            })
            .collect();

        let ClickSummary {
            window_days,
            timezone,
            total_clicks,
            unique_visitors,
            daily,
            by_link,
            top_link,
        } = &snapshot.clicks;

        let busiest = daily.iter().map(|day| day.clicks).max().unwrap_or(0);
        let daily = daily
            .iter()
            .map(|day| DailyBarView {
                date: day.date.to_string(),
                clicks: day.clicks,
                percent: if busiest == 0 {
                    0
                } else {
                    day.clicks * 100 / busiest
                },
            })
            .collect();

        Self {
            counts,
            window_days: *window_days,
            timezone: timezone.clone(),
            total_clicks: *total_clicks,
            unique_visitors: *unique_visitors,
            top_link: top_link.as_ref().map(link_title),
            daily,
            by_link: by_link
                .iter()
                .map(|entry| LinkClicksView {
                    title: link_title(entry),
                    link_id: entry.link_id,
                    clicks: entry.clicks,
                })
                .collect(),
        }
    }
}

fn link_title(entry: &crate::domain::analytics::LinkClickCount) -> String {
    entry
        .title
        .clone()
        .unwrap_or_else(|| "(deleted link)".to_string())
}

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardTemplate {
    pub view: AdminLayout<DashboardView>,
}
