//! Click analytics reduced from raw click records.
//!
//! Everything here is pure: callers load the clicks for the window and the
//! current link list, and the summary is recomputed on every request.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono_tz::Tz;
use serde::Serialize;
use time::{Date, Duration, OffsetDateTime};
use uuid::Uuid;

use super::{clicks::LinkClickRecord, dates::iso_date, links::LinkRecord};
use crate::util::timezone::localized_date;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyClicks {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub clicks: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkClickCount {
    pub link_id: Uuid,
    /// `None` when the link has since been deleted.
    pub title: Option<String>,
    pub clicks: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub first_click_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClickSummary {
    pub window_days: u32,
    pub timezone: String,
    pub total_clicks: u64,
    pub unique_visitors: u64,
    /// One entry per local day in the window, oldest first, zero-filled.
    pub daily: Vec<DailyClicks>,
    /// Most clicked first.
    pub by_link: Vec<LinkClickCount>,
    pub top_link: Option<LinkClickCount>,
}

/// First local day covered by a window of `days` ending on the local day of
/// `now`.
pub fn window_start(now: OffsetDateTime, tz: Tz, days: u32) -> Date {
    let today = localized_date(now, tz);
    let span = i64::from(days.max(1)) - 1;
    today
        .checked_sub(Duration::days(span))
        .unwrap_or(Date::MIN)
}

/// Group clicks by local calendar day in `tz`, inclusive of `start..=end`.
pub fn clicks_by_date(
    clicks: &[LinkClickRecord],
    tz: Tz,
    start: Date,
    end: Date,
) -> Vec<DailyClicks> {
    let mut buckets: BTreeMap<Date, u64> = BTreeMap::new();
    let mut day = start;
    while day <= end {
        buckets.insert(day, 0);
        match day.next_day() {
            Some(next) => day = next,
            None => break,
        }
    }

    for click in clicks {
        let local = localized_date(click.clicked_at, tz);
        if let Some(count) = buckets.get_mut(&local) {
            *count += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(date, clicks)| DailyClicks { date, clicks })
        .collect()
}

/// Per-link counts, most clicked first. Ties go to the link clicked first.
pub fn clicks_by_link(clicks: &[LinkClickRecord], links: &[LinkRecord]) -> Vec<LinkClickCount> {
    let titles: HashMap<Uuid, &str> = links
        .iter()
        .map(|link| (link.id, link.title.as_str()))
        .collect();

    let mut counts: HashMap<Uuid, (u64, OffsetDateTime)> = HashMap::new();
    for click in clicks {
        counts
            .entry(click.link_id)
            .and_modify(|(count, first)| {
                *count += 1;
                if click.clicked_at < *first {
                    *first = click.clicked_at;
                }
            })
            .or_insert((1, click.clicked_at));
    }

    let mut out: Vec<LinkClickCount> = counts
        .into_iter()
        .map(|(link_id, (clicks, first_click_at))| LinkClickCount {
            link_id,
            title: titles.get(&link_id).map(|title| (*title).to_string()),
            clicks,
            first_click_at,
        })
        .collect();
    out.sort_by(|a, b| {
        b.clicks
            .cmp(&a.clicks)
            .then(a.first_click_at.cmp(&b.first_click_at))
            .then(a.link_id.cmp(&b.link_id))
    });
    out
}

pub fn summarize(
    clicks: &[LinkClickRecord],
    links: &[LinkRecord],
    tz: Tz,
    now: OffsetDateTime,
    days: u32,
) -> ClickSummary {
    let days = days.max(1);
    let end = localized_date(now, tz);
    let start = window_start(now, tz, days);

    let in_window: Vec<LinkClickRecord> = clicks
        .iter()
        .filter(|click| {
            let local = localized_date(click.clicked_at, tz);
            local >= start && local <= end
        })
        .cloned()
        .collect();

    let visitors: HashSet<&str> = in_window
        .iter()
        .filter_map(|click| click.visitor_hash.as_deref())
        .collect();

    let by_link = clicks_by_link(&in_window, links);

    ClickSummary {
        window_days: days,
        timezone: tz.name().to_string(),
        total_clicks: in_window.len() as u64,
        unique_visitors: visitors.len() as u64,
        daily: clicks_by_date(&in_window, tz, start, end),
        top_link: by_link.first().cloned(),
        by_link,
    }
}
