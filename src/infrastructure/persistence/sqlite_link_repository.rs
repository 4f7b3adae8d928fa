//! SQLite implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, SortOrder};
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation;

/// How long a connection waits on SQLite's write lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    original_url: String,
    short_code: String,
    created_at: DateTime<Utc>,
    click_count: i64,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(r.id, r.original_url, r.short_code, r.created_at, r.click_count)
    }
}

/// Schema migrations embedded from `migrations/`.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// A migration known to the binary but not yet applied to the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMigration {
    pub version: i64,
    pub description: String,
}

/// Opens a SQLite pool for `database_url` and applies pending migrations.
///
/// File databases run in WAL mode with `synchronous = FULL`, so a committed
/// write survives a crash. `sqlite::memory:` databases are pinned to a single
/// connection that is never recycled, otherwise each pooled connection would
/// see its own empty database.
///
/// # Errors
///
/// Returns an error if the URL is malformed, the database cannot be opened, or
/// a migration fails.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
    connect_timeout: Duration,
) -> Result<SqlitePool, sqlx::Error> {
    let pool = open(database_url, max_connections, connect_timeout, false).await?;

    MIGRATOR.run(&pool).await?;

    Ok(pool)
}

/// Opens an existing database read-only, without creating it or running
/// migrations.
///
/// # Errors
///
/// Returns an error if the URL is malformed or the database file does not exist.
pub async fn connect_existing(
    database_url: &str,
    connect_timeout: Duration,
) -> Result<SqlitePool, sqlx::Error> {
    open(database_url, 1, connect_timeout, true).await
}

/// Lists embedded migrations that have not been applied to `pool`'s database.
///
/// Only reads the database: a missing migrations table means nothing has been
/// applied yet.
///
/// # Errors
///
/// Returns an error if the migrations table cannot be read.
pub async fn pending_migrations(pool: &SqlitePool) -> Result<Vec<PendingMigration>, sqlx::Error> {
    let tables: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;

    let applied: Vec<i64> = if tables > 0 {
        sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success = 1")
            .fetch_all(pool)
            .await?
    } else {
        Vec::new()
    };

    Ok(MIGRATOR
        .iter()
        .filter(|m| !m.migration_type.is_down_migration() && !applied.contains(&m.version))
        .map(|m| PendingMigration {
            version: m.version,
            description: m.description.to_string(),
        })
        .collect())
}

async fn open(
    database_url: &str,
    max_connections: u32,
    connect_timeout: Duration,
    read_only: bool,
) -> Result<SqlitePool, sqlx::Error> {
    let in_memory = database_url.contains(":memory:");

    let mut options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(!read_only)
        .read_only(read_only)
        .busy_timeout(BUSY_TIMEOUT)
        .synchronous(SqliteSynchronous::Full);
    if !in_memory && !read_only {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let pool_options = SqlitePoolOptions::new().acquire_timeout(connect_timeout);
    let pool_options = if in_memory {
        pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options.max_connections(max_connections)
    };

    pool_options.connect_with(options).await
}

/// SQLite repository for link storage and retrieval.
///
/// Uniqueness of `short_code` is enforced by the table's `UNIQUE` constraint and
/// click counts are incremented with a single `UPDATE`, so no locking happens in
/// process.
pub struct SqliteLinkRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for SqliteLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (original_url, short_code, created_at, click_count)
            VALUES (?1, ?2, ?3, 0)
            RETURNING id, original_url, short_code, created_at, click_count
            "#,
        )
        .bind(&new_link.original_url)
        .bind(&new_link.short_code)
        .bind(Utc::now())
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::DuplicateCode(new_link.short_code.clone())
            } else {
                AppError::Storage(e)
            }
        })?;

        Ok(row.into())
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, original_url, short_code, created_at, click_count
            FROM links
            WHERE short_code = ?1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn increment_clicks(&self, short_code: &str) -> Result<u64, AppError> {
        let result =
            sqlx::query("UPDATE links SET click_count = click_count + 1 WHERE short_code = ?1")
                .bind(short_code)
                .execute(self.pool.as_ref())
                .await?;

        Ok(result.rows_affected())
    }

    async fn list_all(&self, order: SortOrder) -> Result<Vec<Link>, AppError> {
        // ids are assigned in creation order and never reused
        let query = match order {
            SortOrder::NewestFirst => {
                "SELECT id, original_url, short_code, created_at, click_count FROM links ORDER BY id DESC"
            }
            SortOrder::OldestFirst => {
                "SELECT id, original_url, short_code, created_at, click_count FROM links ORDER BY id ASC"
            }
        };

        let rows = sqlx::query_as::<_, LinkRow>(query)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
