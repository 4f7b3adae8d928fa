//! Link creation and resolution service.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{error, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, is_well_formed};
use crate::utils::url_validator::UrlPolicy;

/// Attempts at allocating a fresh code before giving up.
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// A newly created link together with its public short URL.
#[derive(Debug, Clone)]
pub struct ShortenedLink {
    pub link: Link,
    pub short_url: String,
}

/// Service for creating and resolving shortened links.
///
/// Holds no mutable state of its own: all shared state lives in the link
/// repository, and click counting is handed to the background worker through
/// `click_sender`.
pub struct LinkService<L: LinkRepository> {
    link_repository: Arc<L>,
    policy: UrlPolicy,
    base_url: String,
    click_sender: mpsc::Sender<ClickEvent>,
}

impl<L: LinkRepository> LinkService<L> {
    /// Creates a new link service.
    ///
    /// `base_url` is the public origin short URLs are built on, e.g.
    /// `https://s.example.com`.
    pub fn new(
        link_repository: Arc<L>,
        policy: UrlPolicy,
        base_url: impl Into<String>,
        click_sender: mpsc::Sender<ClickEvent>,
    ) -> Self {
        Self {
            link_repository,
            policy,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            click_sender,
        }
    }

    /// Validates `original_url` and stores it under a freshly generated code.
    ///
    /// The URL is stored as submitted, minus surrounding whitespace. Shortening
    /// the same URL twice yields two independent links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] if the URL is rejected by the policy.
    /// Returns [`AppError::ExhaustedRetries`] if [`MAX_CODE_ATTEMPTS`] generated
    /// codes all collided.
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn create_short_link(&self, original_url: &str) -> Result<ShortenedLink, AppError> {
        self.policy
            .check(original_url)
            .map_err(|reason| AppError::invalid_url(reason.to_string()))?;

        let original_url = original_url.trim();

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let new_link = NewLink::new(original_url, generate_code());

            match self.link_repository.insert(new_link).await {
                Ok(link) => {
                    let short_url = self.get_short_url(&link.short_code);
                    return Ok(ShortenedLink { link, short_url });
                }
                Err(AppError::DuplicateCode(code)) => {
                    warn!(code = %code, attempt, "Short code collision, regenerating");
                }
                Err(e) => {
                    error!(url = %original_url, "Failed to store link: {}", e);
                    return Err(e);
                }
            }
        }

        Err(AppError::ExhaustedRetries {
            attempts: MAX_CODE_ATTEMPTS,
        })
    }

    /// Resolves a short code for redirection and counts the visit.
    ///
    /// The click is queued for the background worker and never awaited: a full
    /// or closed queue is logged and does not fail the redirect.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn resolve(&self, short_code: &str) -> Result<Link, AppError> {
        let link = self.get_link(short_code).await?;
        self.enqueue_click(&link.short_code);
        Ok(link)
    }

    /// Retrieves a link by its short code without counting a click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Storage`] on database errors.
    pub async fn get_link(&self, short_code: &str) -> Result<Link, AppError> {
        if !is_well_formed(short_code) {
            return Err(AppError::not_found("Short URL not found"));
        }

        self.link_repository
            .find_by_code(short_code)
            .await
            .inspect_err(|e| error!(code = %short_code, "Failed to look up link: {}", e))?
            .ok_or_else(|| AppError::not_found("Short URL not found"))
    }

    /// Constructs the full short URL for `short_code`.
    pub fn get_short_url(&self, short_code: &str) -> String {
        format!("{}/{}", self.base_url, short_code)
    }

    /// Checks that the link store answers.
    pub async fn check_storage(&self) -> Result<(), AppError> {
        self.link_repository.ping().await
    }

    fn enqueue_click(&self, short_code: &str) {
        match self.click_sender.try_send(ClickEvent::new(short_code)) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(code = %event.short_code, "Click queue full, click dropped");
                metrics::counter!("clicks_dropped_total").increment(1);
            }
            Err(TrySendError::Closed(event)) => {
                error!(code = %event.short_code, "Click queue closed, click dropped");
                metrics::counter!("clicks_dropped_total").increment(1);
            }
        }
    }
}
