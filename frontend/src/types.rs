//! Common types used across the frontend application.
//!
//! This module centralizes type definitions to avoid duplication
//! and ensure consistency across components.
//!
//! # Categories
//!
//! - **File Types** - Records as the API returns them
//! - **API Types** - Response envelopes
//! - **Display Helpers** - Size and date formatting
//! - **Error Types** - Frontend error handling

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// File Types
// =============================================================================

/// Metadata for one uploaded file.
///
/// Names are unique on the server, so `name` plus `uploaded_at` keys a row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Stored file name
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// MIME type
    pub content_type: String,
    /// Epoch seconds
    pub uploaded_at: f64,
}

impl FileRecord {
    /// Stable key for list rendering.
    pub fn row_key(&self) -> String {
        format!("{}-{}", self.name, self.uploaded_at)
    }
}

// =============================================================================
// API Response Types
// =============================================================================

/// Response from `GET /files`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FileListResponse {
    pub ok: bool,
    #[serde(default)]
    pub files: Vec<FileRecord>,
}

/// Response from `POST /upload`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub ok: bool,
    pub file: FileRecord,
}

// =============================================================================
// Display Helpers
// =============================================================================

/// `1536` -> `"1.5 KB"`
pub fn format_size_kb(size: u64) -> String {
    format!("{:.1} KB", size as f64 / 1024.0)
}

/// Epoch seconds as a local date-time string.
pub fn format_uploaded_at(uploaded_at: f64) -> String {
    let micros = (uploaded_at * 1_000_000.0) as i64;
    match chrono::DateTime::from_timestamp_micros(micros) {
        Some(t) => t
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => "-".to_string(),
    }
}

/// Fresh request id: 32 lowercase hex characters.
pub fn new_request_id() -> String {
    hex::encode(rand::random::<[u8; 16]>())
}

// =============================================================================
// Error Types
// =============================================================================

/// Frontend application errors.
///
/// Unified error type for all frontend operations.
#[derive(Clone, Debug, PartialEq)]
pub enum AppError {
    /// The API answered with a non-success status.
    Status { action: &'static str, status: u16 },
    /// Request could not be sent or the connection failed.
    Network(String),
    /// Response body did not match the expected shape.
    Decode(String),
    /// A browser API (FormData, AbortController, ...) failed.
    Browser(String),
    /// The request was aborted through its own signal.
    Cancelled,
}

impl AppError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Cancelled)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Status { action, status } => write!(f, "{} failed: {}", action, status),
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::Decode(msg) => write!(f, "Invalid response: {}", msg),
            AppError::Browser(msg) => write!(f, "Browser error: {}", msg),
            AppError::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::error::Error for AppError {}

/// Result type alias for frontend operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_response_deserialization() {
        let json = r#"{
            "ok": true,
            "files": [
                {"name": "b.txt", "size": 2048, "content_type": "text/plain", "uploaded_at": 1700000001.25},
                {"name": "a.png", "size": 10, "content_type": "image/png", "uploaded_at": 1700000000.0}
            ]
        }"#;

        let parsed: FileListResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.ok);
        assert_eq!(parsed.files.len(), 2);
        assert_eq!(parsed.files[0].name, "b.txt");
        assert_eq!(parsed.files[0].row_key(), "b.txt-1700000001.25");
    }

    #[test]
    fn test_list_response_without_files() {
        let parsed: FileListResponse = serde_json::from_str(r#"{"ok": true}"#).unwrap();
        assert!(parsed.files.is_empty());
    }

    #[test]
    fn test_format_size_kb() {
        assert_eq!(format_size_kb(0), "0.0 KB");
        assert_eq!(format_size_kb(1536), "1.5 KB");
        assert_eq!(format_size_kb(1024 * 1024), "1024.0 KB");
    }

    #[test]
    fn test_format_uploaded_at() {
        let shown = format_uploaded_at(1_700_000_000.0);
        assert_eq!(shown.len(), "2023-11-14 22:13:20".len());
        assert!(shown.starts_with("2023-11-1"));
    }

    #[test]
    fn test_request_id_shape() {
        let id = new_request_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(id, new_request_id());
    }

    #[test]
    fn test_error_display() {
        let err = AppError::Status {
            action: "Upload",
            status: 413,
        };
        assert_eq!(err.to_string(), "Upload failed: 413");
        assert!(AppError::Cancelled.is_cancelled());
        assert!(!err.is_cancelled());
    }
}
