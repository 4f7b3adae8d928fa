//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = check_database(&state).await;
    let queue_check = check_click_queue(&state);

    let all_healthy = db_check.is_ok() && queue_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "ok" } else { "degraded" }.to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database: db_check,
            click_queue: queue_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match state.link_service.check_storage().await {
        Ok(()) => CheckStatus::ok("Connected"),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            CheckStatus::error("Database unavailable")
        }
    }
}

fn check_click_queue(state: &AppState) -> CheckStatus {
    if state.click_sender.is_closed() {
        CheckStatus::error("Click queue is closed")
    } else {
        CheckStatus::ok(format!(
            "Free capacity: {}/{}",
            state.click_sender.capacity(),
            state.click_sender.max_capacity()
        ))
    }
}
