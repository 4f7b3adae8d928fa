//! DTOs for aggregate statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::services::LinkStats;
use crate::domain::entities::Link;

/// Totals across all links plus the newest ones.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_urls: i64,
    pub total_clicks: i64,
    pub recent_urls: Vec<LinkInfo>,
}

/// Public view of a stored link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkInfo {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub click_count: i64,
}

impl From<Link> for LinkInfo {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            short_code: link.short_code,
            original_url: link.original_url,
            created_at: link.created_at,
            click_count: link.click_count,
        }
    }
}

impl From<LinkStats> for StatsResponse {
    fn from(stats: LinkStats) -> Self {
        Self {
            total_urls: stats.total_urls,
            total_clicks: stats.total_clicks,
            recent_urls: stats.recent.into_iter().map(LinkInfo::from).collect(),
        }
    }
}
