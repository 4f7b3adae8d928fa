//! Application layer services implementing business logic.
//!
//! Services consume repository traits and give HTTP handlers and the admin CLI
//! a small API.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Shortening and redirect resolution
//! - [`services::stats_service::StatsService`] - Link and click totals

pub mod services;
