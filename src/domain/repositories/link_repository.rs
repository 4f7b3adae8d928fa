//! Repository trait for short link storage.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Ordering for [`LinkRepository::list_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Durable mapping from short code to original URL.
///
/// Implementations must enforce short code uniqueness on insert and increment
/// click counters atomically in place. Every successful write is durable before
/// the call returns.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteLinkRepository`] - SQLite implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a link with a fresh id, `created_at = now` and a zero click count.
    ///
    /// The same `original_url` may be stored under any number of codes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateCode`] if the short code already exists.
    /// Returns [`AppError::Storage`] on database errors.
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Point lookup by short code. Has no side effects.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn find_by_code(&self, short_code: &str) -> Result<Option<Link>, AppError>;

    /// Atomically adds one to the click counter of `short_code`.
    ///
    /// Returns the number of rows affected; `0` means the code does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn increment_clicks(&self, short_code: &str) -> Result<u64, AppError>;

    /// Returns every stored link in the requested order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on database errors.
    async fn list_all(&self, order: SortOrder) -> Result<Vec<Link>, AppError>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
