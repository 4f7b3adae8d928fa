//! Classification of database errors returned by SQLx.

/// Returns true when `e` is a unique constraint violation.
///
/// The `links` table has a single unique column besides the primary key, so a
/// unique violation on insert always means a short code collision.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}
