//! Application error type and its HTTP mapping.
//!
//! Every failure that can leave the service layer is an [`AppError`]. Client
//! errors (400, 404) carry their message to the caller; everything else is
//! logged and reported as a generic 500.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Body returned for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Rejected by the URL validator: bad syntax, disallowed scheme or blocked host.
    #[error("{0}")]
    InvalidUrl(String),

    /// A generated short code collided with an existing one.
    #[error("Short code already exists: {0}")]
    DuplicateCode(String),

    /// Malformed request body.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Every generated code collided with an existing one.
    #[error("Failed to allocate a unique short code after {attempts} attempts")]
    ExhaustedRetries { attempts: usize },

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl AppError {
    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::InvalidUrl(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidUrl(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateCode(_)
            | AppError::ExhaustedRetries { .. }
            | AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::invalid_url("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::bad_request("bad body").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::not_found("missing").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::ExhaustedRetries { attempts: 5 }.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::DuplicateCode("abc".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Storage(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_url_message_is_preserved() {
        let err = AppError::invalid_url("Only HTTP and HTTPS URLs are allowed");
        assert_eq!(err.to_string(), "Only HTTP and HTTPS URLs are allowed");
    }

    #[test]
    fn test_storage_error_from_sqlx() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::Storage(_)));
    }
}
