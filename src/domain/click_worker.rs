//! Background worker applying click increments.
//!
//! Increments run off the redirect path, up to `concurrency` at a time, each
//! retried with jittered exponential backoff. An increment that still fails is
//! logged and counted in `clicks_failed_total`; it is never silently dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;

/// Retries after the first failed attempt.
const MAX_RETRIES: usize = 3;

/// Base for the exponential backoff, in milliseconds.
const BACKOFF_BASE_MS: u64 = 10;

const MAX_BACKOFF: Duration = Duration::from_secs(1);

/// Consumes click events until every sender is dropped.
///
/// Returns only after all in-flight increments have finished, so awaiting the
/// worker after closing the channel flushes every queued click.
pub async fn run_click_worker<L>(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<L>,
    concurrency: usize,
) where
    L: LinkRepository + 'static,
{
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let repository = repository.clone();

        tasks.spawn(async move {
            let _permit = permit;
            record_click(repository.as_ref(), &event).await;
        });

        while let Some(joined) = tasks.try_join_next() {
            if let Err(e) = joined {
                error!("Click task panicked: {}", e);
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            error!("Click task panicked: {}", e);
        }
    }

    info!("Click worker stopped");
}

/// Applies a single increment with retries.
async fn record_click<L>(repository: &L, event: &ClickEvent)
where
    L: LinkRepository + ?Sized,
{
    let strategy = ExponentialBackoff::from_millis(BACKOFF_BASE_MS)
        .max_delay(MAX_BACKOFF)
        .map(jitter)
        .take(MAX_RETRIES);

    let result = Retry::start(strategy, || repository.increment_clicks(&event.short_code)).await;

    match result {
        Ok(0) => {
            warn!(code = %event.short_code, "Click for unknown short code was not counted");
            metrics::counter!("clicks_failed_total").increment(1);
        }
        Ok(_) => {
            debug!(code = %event.short_code, "Click recorded");
            metrics::counter!("clicks_recorded_total").increment(1);
        }
        Err(e) => {
            error!(
                code = %event.short_code,
                resolved_at = %event.resolved_at,
                "Failed to record click after {} retries: {}",
                MAX_RETRIES,
                e
            );
            metrics::counter!("clicks_failed_total").increment(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_worker_applies_every_event() {
        let mut repo = MockLinkRepository::new();
        repo.expect_increment_clicks()
            .withf(|code| code == "abcd1234")
            .times(3)
            .returning(|_| Ok(1));

        let (tx, rx) = mpsc::channel(10);
        let worker = tokio::spawn(run_click_worker(rx, Arc::new(repo), 2));

        for _ in 0..3 {
            tx.send(ClickEvent::new("abcd1234")).await.unwrap();
        }
        drop(tx);

        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_worker_retries_transient_failures() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();

        let mut repo = MockLinkRepository::new();
        repo.expect_increment_clicks().times(2).returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(AppError::Storage(sqlx::Error::PoolTimedOut))
            } else {
                Ok(1)
            }
        });

        let (tx, rx) = mpsc::channel(10);
        let worker = tokio::spawn(run_click_worker(rx, Arc::new(repo), 1));

        tx.send(ClickEvent::new("retry123")).await.unwrap();
        drop(tx);
        worker.await.unwrap();

        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_worker_gives_up_after_max_retries() {
        let mut repo = MockLinkRepository::new();
        repo.expect_increment_clicks()
            .times(MAX_RETRIES + 1)
            .returning(|_| Err(AppError::Storage(sqlx::Error::PoolTimedOut)));

        let (tx, rx) = mpsc::channel(10);
        let worker = tokio::spawn(run_click_worker(rx, Arc::new(repo), 1));

        tx.send(ClickEvent::new("failing1")).await.unwrap();
        drop(tx);
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_worker_does_not_retry_unknown_code() {
        let mut repo = MockLinkRepository::new();
        repo.expect_increment_clicks().times(1).returning(|_| Ok(0));

        let (tx, rx) = mpsc::channel(10);
        let worker = tokio::spawn(run_click_worker(rx, Arc::new(repo), 1));

        tx.send(ClickEvent::new("missing1")).await.unwrap();
        drop(tx);
        worker.await.unwrap();
    }
}
