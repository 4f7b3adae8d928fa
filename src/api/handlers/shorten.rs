//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for one URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/page" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "shortCode": "aZ3_k-9Q",
///   "originalUrl": "https://example.com/page",
///   "shortUrl": "https://s.example.com/aZ3_k-9Q"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for an unparsable body or a rejected URL, and
/// 500 Internal Server Error if the link could not be stored.
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

    let url = request.url.unwrap_or_default();
    let shortened = state.link_service.create_short_link(&url).await?;

    tracing::info!(
        code = %shortened.link.short_code,
        url = %shortened.link.original_url,
        "Short link created"
    );

    Ok((StatusCode::CREATED, Json(shortened.into())))
}
