//! Links-in-bio: public listing, click recording and click analytics.

use std::sync::Arc;

use metrics::counter;
use thiserror::Error;
use time::{Duration, OffsetDateTime, Time};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    application::repos::{CollectionRepo, LinkClicksRepo, ProfileRepo, RepoError},
    domain::{
        analytics::{self, ClickSummary},
        clicks::{NewLinkClick, visitor_hash},
        links::LinkRecord,
    },
};

const TARGET: &str = "folio::links";

#[derive(Debug, Error)]
pub enum LinkServiceError {
    #[error("link not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Analytics window bounds, in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsWindow {
    pub default_days: u32,
    pub max_days: u32,
}

impl AnalyticsWindow {
    /// Resolve a requested window, falling back to the default and capping
    /// at the maximum.
    pub fn resolve(&self, requested: Option<u32>) -> u32 {
        requested
            .filter(|days| *days > 0)
            .unwrap_or(self.default_days)
            .clamp(1, self.max_days.max(1))
    }
}

impl Default for AnalyticsWindow {
    fn default() -> Self {
        Self {
            default_days: 30,
            max_days: 365,
        }
    }
}

/// Request metadata captured with a click.
#[derive(Debug, Clone, Default)]
pub struct ClickContext {
    pub client: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

#[derive(Clone)]
pub struct LinkService {
    links: Arc<dyn CollectionRepo<LinkRecord>>,
    clicks: Arc<dyn LinkClicksRepo>,
    profile: Arc<dyn ProfileRepo>,
    window: AnalyticsWindow,
}

impl LinkService {
    pub fn new(
        links: Arc<dyn CollectionRepo<LinkRecord>>,
        clicks: Arc<dyn LinkClicksRepo>,
        profile: Arc<dyn ProfileRepo>,
        window: AnalyticsWindow,
    ) -> Self {
        Self {
            links,
            clicks,
            profile,
            window,
        }
    }

    pub fn window(&self) -> AnalyticsWindow {
        self.window
    }

    /// Active links in display order.
    pub async fn active_links(&self) -> Result<Vec<LinkRecord>, LinkServiceError> {
        let mut links = self.links.list().await?;
        links.retain(|link| link.active);
        Ok(links)
    }

    /// Record a click on an active link and return its destination.
    pub async fn record_click(
        &self,
        id: Uuid,
        context: ClickContext,
    ) -> Result<String, LinkServiceError> {
        let link = match self.links.find_by_id(id).await? {
            Some(link) if link.active => link,
            _ => return Err(LinkServiceError::NotFound),
        };

        let click = NewLinkClick::new(
            link.id,
            OffsetDateTime::now_utc(),
            context.referrer.as_deref(),
            visitor_hash(context.client.as_deref(), context.user_agent.as_deref()),
        );

        // Storage failures here still redirect.
        match self.clicks.record_click(click).await {
            Ok(_) => {
                counter!("folio_link_clicks_total").increment(1);
                info!(target: TARGET, link_id = %link.id, "link click recorded");
            }
            Err(err) => {
                warn!(
                    target: TARGET,
                    link_id = %link.id,
                    error = %err,
                    "failed to record link click"
                );
            }
        }

        Ok(link.url)
    }

    /// Click summary over the last `days` local days of the profile timezone.
    pub async fn click_summary(
        &self,
        days: Option<u32>,
    ) -> Result<ClickSummary, LinkServiceError> {
        let days = self.window.resolve(days);
        let now = OffsetDateTime::now_utc();
        let tz = self.profile.load_profile().await?.timezone;

        // Widen the fetch by a day so the first local day is fully covered
        // regardless of the zone offset.
        let start = analytics::window_start(now, tz, days);
        let since = start
            .with_time(Time::MIDNIGHT)
            .assume_utc()
            .checked_sub(Duration::DAY)
            .unwrap_or(OffsetDateTime::UNIX_EPOCH);

        let (clicks, links) =
            tokio::try_join!(self.clicks.list_clicks_since(since), self.links.list())?;

        Ok(analytics::summarize(&clicks, &links, tz, now, days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_resolution_clamps() {
        let window = AnalyticsWindow {
            default_days: 30,
            max_days: 90,
        };

        assert_eq!(window.resolve(None), 30);
        assert_eq!(window.resolve(Some(0)), 30);
        assert_eq!(window.resolve(Some(7)), 7);
        assert_eq!(window.resolve(Some(400)), 90);
    }
}
