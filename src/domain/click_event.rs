//! Click event model for asynchronous click counting.

use chrono::{DateTime, Utc};

/// A resolved redirect waiting to be counted.
///
/// Sent from [`crate::application::services::LinkService::resolve`] to the
/// background worker ([`crate::domain::click_worker::run_click_worker`]) so the
/// redirect response never waits on the counter write.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub short_code: String,
    pub resolved_at: DateTime<Utc>,
}

impl ClickEvent {
    /// Creates a click event stamped with the current time.
    pub fn new(short_code: impl Into<String>) -> Self {
        Self {
            short_code: short_code.into(),
            resolved_at: Utc::now(),
        }
    }
}
