//! Handler for aggregate statistics.

use axum::{Json, extract::State};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns link and click totals plus the most recently created links.
///
/// # Endpoint
///
/// `GET /api/stats`
///
/// # Response
///
/// ```json
/// {
///   "totalUrls": 2,
///   "totalClicks": 3,
///   "recentUrls": [
///     {
///       "id": 2,
///       "shortCode": "aZ3_k-9Q",
///       "originalUrl": "https://example.com/page",
///       "createdAt": "2025-06-01T12:00:00Z",
///       "clickCount": 1
///     }
///   ]
/// }
/// ```
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.stats_service.get_summary().await?;

    Ok(Json(stats.into()))
}
