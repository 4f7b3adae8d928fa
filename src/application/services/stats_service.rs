//! Aggregate link statistics.

use std::sync::Arc;

use crate::domain::entities::Link;
use crate::domain::repositories::{LinkRepository, SortOrder};
use crate::error::AppError;

/// Totals across all links plus the most recently created ones.
#[derive(Debug, Clone)]
pub struct LinkStats {
    pub total_urls: i64,
    pub total_clicks: i64,
    pub recent: Vec<Link>,
}

/// Service computing usage statistics from the link store.
pub struct StatsService<L: LinkRepository> {
    link_repository: Arc<L>,
    recent_limit: usize,
}

impl<L: LinkRepository> StatsService<L> {
    /// Creates a statistics service reporting at most `recent_limit` recent links.
    pub fn new(link_repository: Arc<L>, recent_limit: usize) -> Self {
        Self {
            link_repository,
            recent_limit,
        }
    }

    /// Returns totals and the newest links, using the configured limit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn get_summary(&self) -> Result<LinkStats, AppError> {
        self.get_summary_with_limit(self.recent_limit).await
    }

    /// Returns totals and at most `limit` of the newest links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn get_summary_with_limit(&self, limit: usize) -> Result<LinkStats, AppError> {
        let links = self.link_repository.list_all(SortOrder::NewestFirst).await?;

        let total_urls = links.len() as i64;
        let total_clicks = links.iter().map(|l| l.click_count).sum();
        let recent = links.into_iter().take(limit).collect();

        Ok(LinkStats {
            total_urls,
            total_clicks,
            recent,
        })
    }
}
