//! # Filedrop - upload files and list what was uploaded
//!
//! The backend half of Filedrop: the HTTP API the web client talks to and a
//! native client for the same API.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐  multipart  ┌─────────────┐     ┌──────────────┐
//! │  Web client │────────────▶│  API server │────▶│  File store  │
//! │  / CLI      │◀────────────│   (axum)    │◀────│ (in memory)  │
//! └─────────────┘    JSON     └─────────────┘     └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use filedrop::{ApiClient, Settings};
//!
//! #[tokio::main]
//! async fn main() {
//!     tokio::spawn(filedrop::server::start_server(Settings::default()));
//!     let client = ApiClient::new("http://localhost:8000/api/v1").unwrap();
//!     let listed = client.list_files().await.unwrap();
//!     println!("{} files", listed.files.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per layer
//! - [`config`] - Server settings (flags + environment)
//! - [`logging`] - Tracing subscriber setup
//! - [`models`] - File metadata
//! - [`storage`] - File store and name sanitizing
//! - [`metrics`] - Upload counters and request gauges
//! - [`api`] - HTTP server, middleware and wire types
//! - [`client`] - Native API client

// Core modules
pub mod config;
pub mod error;
pub mod logging;
pub mod models;

// Storage
pub mod storage;

// Observability
pub mod metrics;

// HTTP API
pub mod api;

// Client
pub mod client;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{LogFormat, Settings, API_VERSION};
pub use error::{ApiError, ClientError, StoreError};
pub use models::FileMeta;
pub use storage::{sanitize_filename, FileStore, MemoryStore};
pub use metrics::{Metrics, MetricsSnapshot};
pub use api::types::{FileListResponse, HealthResponse, UploadResponse};
pub use client::{ApiClient, UploadProgress};

// Server
pub mod server {
    pub use crate::api::server::{build_router, start_server, AppState};
}
