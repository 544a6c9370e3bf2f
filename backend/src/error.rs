//! Error types for the Filedrop API and client.
//!
//! - [`StoreError`] - file store failures
//! - [`ApiError`] - request-level failures, rendered as `{ ok: false, error }`
//! - [`ClientError`] - native API client failures
//!
//! Conversion is automatic via `From` implementations, so `?` works across
//! layer boundaries.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

// =============================================================================
// Store Errors
// =============================================================================

/// Errors raised by a [`crate::storage::FileStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No file stored under that name.
    #[error("file not found: {0}")]
    NotFound(String),

    /// Backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

// =============================================================================
// API Errors
// =============================================================================

/// Errors returned by HTTP handlers.
///
/// The `Display` text is exactly what goes into the `error` field of the
/// response envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Multipart body has no `file` field.
    #[error("missing file")]
    MissingFile,

    /// Multipart body could not be read.
    #[error("invalid multipart")]
    InvalidMultipart(String),

    /// File name is empty once sanitized.
    #[error("invalid filename")]
    InvalidFilename,

    /// Upload exceeds the configured byte limit.
    #[error("file too large")]
    TooLarge { limit: usize },

    /// Upload did not complete within the request deadline.
    #[error("request timeout")]
    Timeout,

    /// CSRF header required but absent.
    #[error("csrf token required")]
    CsrfMissing,

    /// Requested file does not exist.
    #[error("file not found")]
    NotFound(String),

    /// Anything else.
    #[error("internal_error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFile | ApiError::InvalidMultipart(_) | ApiError::InvalidFilename => {
                StatusCode::BAD_REQUEST
            }
            ApiError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::CsrfMissing => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(name) => ApiError::NotFound(name),
            StoreError::Backend(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Internal(detail) => tracing::error!(%detail, "internal error"),
            ApiError::InvalidMultipart(detail) => tracing::warn!(%detail, "rejected multipart body"),
            ApiError::TooLarge { limit } => tracing::warn!(limit, "rejected oversize upload"),
            other => tracing::debug!(error = %other, "request rejected"),
        }
        (status, Json(error_body(&self.to_string()))).into_response()
    }
}

/// Build the JSON error envelope.
pub fn error_body(error: &str) -> serde_json::Value {
    json!({ "ok": false, "error": error })
}

// =============================================================================
// Client Errors
// =============================================================================

/// Errors from the native [`crate::client::ApiClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport or decoding failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("{action} failed: {status}")]
    Status { action: &'static str, status: u16 },

    /// Local file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// API base URL is unusable.
    #[error("invalid API base: {0}")]
    InvalidBase(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::MissingFile.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidFilename.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::TooLarge { limit: 10 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(ApiError::Timeout.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(ApiError::CsrfMissing.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_error_conversion() {
        let api: ApiError = StoreError::NotFound("a.txt".into()).into();
        assert!(matches!(api, ApiError::NotFound(ref n) if n == "a.txt"));
        assert_eq!(api.status(), StatusCode::NOT_FOUND);

        let api: ApiError = StoreError::Backend("disk on fire".into()).into();
        assert_eq!(api.to_string(), "internal_error");
    }

    #[test]
    fn test_client_status_format() {
        let err = ClientError::Status { action: "Upload", status: 413 };
        assert_eq!(err.to_string(), "Upload failed: 413");
    }

    #[test]
    fn test_error_body_shape() {
        let body = error_body("file too large");
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "file too large");
    }
}
