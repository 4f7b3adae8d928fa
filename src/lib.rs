//! # Link Shortener
//!
//! Maps long URLs to short codes, persists the mapping in SQLite, and redirects
//! visitors from a short code to the original URL while counting visits.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Entities, the link store contract, click worker
//! - **Application Layer** ([`application`]) - Shortening, resolution and statistics
//! - **Infrastructure Layer** ([`infrastructure`]) - SQLite persistence
//! - **API Layer** ([`api`]) - REST handlers, DTOs, and middleware
//!
//! ## Quick Start
//!
//! ```bash
//! export DATABASE_URL="sqlite://urls.db"
//! export BASE_URL="https://s.example.com"
//! cargo run
//! ```
//!
//! Migrations are applied on startup.
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{LinkService, ShortenedLink, StatsService};
    pub use crate::domain::entities::{Link, NewLink};
    pub use crate::domain::repositories::{LinkRepository, SortOrder};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
