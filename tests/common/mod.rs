#![allow(dead_code)]

use link_shortener::application::services::{LinkService, StatsService};
use link_shortener::domain::click_event::ClickEvent;
use link_shortener::domain::click_worker::run_click_worker;
use link_shortener::domain::repositories::LinkRepository;
use link_shortener::infrastructure::persistence::{self, SqliteLinkRepository};
use link_shortener::state::AppState;
use link_shortener::utils::url_validator::{Environment, UrlPolicy};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const BASE_URL: &str = "https://s.example.com";

pub async fn memory_pool() -> SqlitePool {
    persistence::connect("sqlite::memory:", 1, Duration::from_secs(5))
        .await
        .unwrap()
}

pub fn test_policy() -> UrlPolicy {
    UrlPolicy::new(Environment::Production, ["blocked.example"])
}

pub async fn create_test_link(pool: &SqlitePool, code: &str, url: &str) {
    sqlx::query("INSERT INTO links (original_url, short_code, created_at) VALUES (?1, ?2, ?3)")
        .bind(url)
        .bind(code)
        .bind(chrono::Utc::now())
        .execute(pool)
        .await
        .unwrap();
}

pub async fn click_count(pool: &SqlitePool, code: &str) -> i64 {
    sqlx::query_scalar("SELECT click_count FROM links WHERE short_code = ?1")
        .bind(code)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Polls until `code` has `expected` clicks, panicking after five seconds.
pub async fn wait_for_clicks(pool: &SqlitePool, code: &str, expected: i64) {
    for _ in 0..500 {
        if click_count(pool, code).await == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "expected {} clicks for {}, found {}",
        expected,
        code,
        click_count(pool, code).await
    );
}

pub fn spawn_worker<L>(rx: mpsc::Receiver<ClickEvent>, repository: Arc<L>) -> JoinHandle<()>
where
    L: LinkRepository + 'static,
{
    tokio::spawn(run_click_worker(rx, repository, 4))
}

/// Builds application state over `pool`.
///
/// The click receiver is returned so tests can either inspect queued events
/// or hand it to [`spawn_worker`].
pub fn create_test_state(pool: SqlitePool) -> (AppState, mpsc::Receiver<ClickEvent>) {
    let repo = Arc::new(SqliteLinkRepository::new(Arc::new(pool)));
    let (tx, rx) = mpsc::channel(100);

    let link_service = Arc::new(LinkService::new(
        repo.clone(),
        test_policy(),
        BASE_URL,
        tx.clone(),
    ));
    let stats_service = Arc::new(StatsService::new(repo, 10));

    (AppState::new(link_service, stats_service, tx), rx)
}

/// Builds state with a running click worker.
pub fn create_counting_state(pool: SqlitePool) -> (AppState, JoinHandle<()>) {
    let (state, rx) = create_test_state(pool.clone());
    let repo = Arc::new(SqliteLinkRepository::new(Arc::new(pool)));
    (state, spawn_worker(rx, repo))
}
