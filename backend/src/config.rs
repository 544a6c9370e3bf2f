//! Server settings.
//!
//! Every setting can be given as a `serve` flag or an environment variable
//! (a `.env` file is loaded first by `main`).

use clap::{ArgAction, Args, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Crate version, reported in `x-api-version` and `/health`.
pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default upload limit (10 MiB).
pub const DEFAULT_MAX_UPLOAD_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Human-readable, for local development
    Pretty,
}

#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Service name reported by `/health`
    #[arg(long, env = "APP_NAME", default_value = "file-upload-app")]
    pub app_name: String,

    /// Path prefix all API routes are mounted under
    #[arg(long, env = "API_PREFIX", default_value = "/api/v1")]
    pub api_prefix: String,

    /// Deployment environment label
    #[arg(long = "env", env = "ENV", default_value = "dev")]
    pub environment: String,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Origin allowed by CORS
    #[arg(long, env = "FRONTEND_ORIGIN", default_value = "http://localhost:3000")]
    pub frontend_origin: String,

    /// Largest accepted upload, in bytes
    #[arg(long, env = "MAX_UPLOAD_SIZE_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_SIZE_BYTES)]
    pub max_upload_size_bytes: usize,

    /// Seconds allowed for reading an upload body
    #[arg(long, env = "REQUEST_TIMEOUT_SEC", default_value_t = 30)]
    pub request_timeout_sec: u64,

    /// Expose `/metrics`
    #[arg(long, env = "ENABLE_METRICS", default_value_t = true, action = ArgAction::Set)]
    pub enable_metrics: bool,

    /// Reject uploads without an `x-csrf-token` header
    #[arg(long, env = "FEATURE_REQUIRE_CSRF_HEADER", default_value_t = false, action = ArgAction::Set)]
    pub require_csrf_header: bool,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,

    /// Directory with the built frontend, served for non-API paths
    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<PathBuf>,
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_sec)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// API prefix without a trailing slash; `"/"` collapses to `""`.
    pub fn normalized_prefix(&self) -> String {
        let trimmed = self.api_prefix.trim_end_matches('/');
        if trimmed.is_empty() || trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "file-upload-app".to_string(),
            api_prefix: "/api/v1".to_string(),
            environment: "dev".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            frontend_origin: "http://localhost:3000".to_string(),
            max_upload_size_bytes: DEFAULT_MAX_UPLOAD_SIZE_BYTES,
            request_timeout_sec: 30,
            enable_metrics: true,
            require_csrf_header: false,
            log_format: LogFormat::Json,
            static_dir: None,
        }
    }
}
