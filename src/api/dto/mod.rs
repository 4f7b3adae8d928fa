//! Data Transfer Objects for API requests and responses.
//!
//! Field names follow the public JSON contract (`camelCase`).

pub mod health;
pub mod shorten;
pub mod stats;
