//! Core domain entities.
//!
//! - [`Link`] - a persisted short code to URL mapping with its click counter
//! - [`NewLink`] - input for creating a link

pub mod link;

pub use link::{Link, NewLink};
