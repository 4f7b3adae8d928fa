//! Domain layer containing business entities and storage contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click counting event model
//! - [`click_worker`] - Asynchronous click counting worker
//!
//! # Click Processing Flow
//!
//! 1. [`crate::application::services::LinkService::resolve`] finds the link
//! 2. A [`click_event::ClickEvent`] is queued without waiting
//! 3. [`click_worker::run_click_worker`] applies the increment with retries
//! 4. The counter is bumped via [`repositories::LinkRepository::increment_clicks`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
