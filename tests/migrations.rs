use link_shortener::infrastructure::persistence;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

async fn table_count(pool: &sqlx::SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_fresh_database_reports_every_migration_pending() {
    let pool = persistence::connect_existing("sqlite::memory:", TIMEOUT)
        .await
        .unwrap();

    let pending = persistence::pending_migrations(&pool).await.unwrap();

    assert_eq!(pending.len(), persistence::MIGRATOR.iter().count());
    assert!(pending.iter().any(|m| m.description == "create links"));
    assert_eq!(table_count(&pool).await, 0);
}

#[tokio::test]
async fn test_migrated_database_has_nothing_pending() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("links.db").display());

    persistence::connect(&url, 1, TIMEOUT).await.unwrap().close().await;

    let pool = persistence::connect_existing(&url, TIMEOUT).await.unwrap();
    assert!(persistence::pending_migrations(&pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_check_does_not_create_missing_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.db");
    let url = format!("sqlite://{}", path.display());

    assert!(persistence::connect_existing(&url, TIMEOUT).await.is_err());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_check_does_not_apply_migrations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.db");
    std::fs::File::create(&path).unwrap();
    let url = format!("sqlite://{}", path.display());

    let pool = persistence::connect_existing(&url, TIMEOUT).await.unwrap();
    assert_eq!(persistence::pending_migrations(&pool).await.unwrap().len(), 1);
    assert_eq!(table_count(&pool).await, 0);
}
