//! Business logic services for the application layer.

pub mod link_service;
pub mod stats_service;

pub use link_service::{LinkService, MAX_CODE_ATTEMPTS, ShortenedLink};
pub use stats_service::{LinkStats, StatsService};
