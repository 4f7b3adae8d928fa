//! Helpers for short code generation, URL admission and database errors.
//!
//! - [`code_generator`] - Short code generation
//! - [`url_validator`] - URL admission policy
//! - [`db_error`] - SQLx error classification

pub mod code_generator;
pub mod db_error;
pub mod url_validator;
