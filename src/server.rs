//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, the click worker, and the Axum server lifecycle.

use crate::application::services::{LinkService, StatsService};
use crate::config::Config;
use crate::domain::click_worker::run_click_worker;
use crate::infrastructure::persistence::{self, SqliteLinkRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// How long queued clicks may take to flush after the server stops.
const CLICK_FLUSH_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - SQLite connection pool and migrations
/// - Background click worker
/// - Axum HTTP server with graceful shutdown
///
/// Once the server has stopped, the click channel closes and queued clicks are
/// flushed before returning.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = persistence::connect(
        &config.database_url,
        config.db_max_connections,
        config.connect_timeout(),
    )
    .await
    .context("Failed to open database")?;
    tracing::info!("Connected to database");

    let repository = Arc::new(SqliteLinkRepository::new(Arc::new(pool.clone())));

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);
    let worker = tokio::spawn(run_click_worker(
        click_rx,
        repository.clone(),
        config.click_worker_concurrency,
    ));
    tracing::info!("Click worker started");

    let link_service = Arc::new(LinkService::new(
        repository.clone(),
        config.url_policy(),
        config.base_url.clone(),
        click_tx.clone(),
    ));
    let stats_service = Arc::new(StatsService::new(repository, config.stats_recent_limit));

    let state = AppState::new(link_service, stats_service, click_tx);
    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped, flushing click queue");
    match tokio::time::timeout(CLICK_FLUSH_TIMEOUT, worker).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("Click worker panicked: {}", e),
        Err(_) => tracing::warn!(
            "Click queue not flushed within {:?}, pending clicks are lost",
            CLICK_FLUSH_TIMEOUT
        ),
    }

    pool.close().await;
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
