//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL with its usage counter.
///
/// `original_url`, `short_code` and `created_at` never change after creation;
/// `click_count` only grows, through the store's atomic increment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub click_count: i64,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        original_url: String,
        short_code: String,
        created_at: DateTime<Utc>,
        click_count: i64,
    ) -> Self {
        Self {
            id,
            original_url,
            short_code,
            created_at,
            click_count,
        }
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub original_url: String,
    pub short_code: String,
}

impl NewLink {
    pub fn new(original_url: impl Into<String>, short_code: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            short_code: short_code.into(),
        }
    }
}
