//! Shared application state injected into every handler.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{LinkService, StatsService};
use crate::domain::click_event::ClickEvent;
use crate::infrastructure::persistence::SqliteLinkRepository;

/// Handles to the services, built once at startup.
///
/// Cloning is cheap: every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<SqliteLinkRepository>>,
    pub stats_service: Arc<StatsService<SqliteLinkRepository>>,
    /// Same channel the link service queues clicks on; kept for health checks.
    pub click_sender: mpsc::Sender<ClickEvent>,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService<SqliteLinkRepository>>,
        stats_service: Arc<StatsService<SqliteLinkRepository>>,
        click_sender: mpsc::Sender<ClickEvent>,
    ) -> Self {
        Self {
            link_service,
            stats_service,
            click_sender,
        }
    }
}
