//! SQLite repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx.
//!
//! # Repositories
//!
//! - [`SqliteLinkRepository`] - Link storage, lookup and click counting

pub mod sqlite_link_repository;

pub use sqlite_link_repository::{
    MIGRATOR, PendingMigration, SqliteLinkRepository, connect, connect_existing,
    pending_migrations,
};
