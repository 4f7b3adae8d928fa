//! DTOs for the link shortening endpoint.

use serde::{Deserialize, Serialize};

use crate::application::services::ShortenedLink;

/// Request to shorten a single URL.
///
/// `url` is optional at the serde level so a missing field is reported as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct ShortenRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Created short link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_code: String,
    pub original_url: String,
    pub short_url: String,
}

impl From<ShortenedLink> for ShortenResponse {
    fn from(shortened: ShortenedLink) -> Self {
        Self {
            short_code: shortened.link.short_code,
            original_url: shortened.link.original_url,
            short_url: shortened.short_url,
        }
    }
}
