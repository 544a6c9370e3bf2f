//! HTTP server for the Filedrop API.
//!
//! # API Endpoints
//!
//! All paths below are mounted under the configured API prefix
//! (`/api/v1` by default). `/health` is also answered at the root.
//!
//! | Method | Path             | Description                      |
//! |--------|------------------|----------------------------------|
//! | GET    | `/health`        | Health check                     |
//! | GET    | `/files`         | List uploaded files, newest first |
//! | GET    | `/files/{name}`  | Download one file                |
//! | POST   | `/upload`        | Multipart upload, field `file`   |
//! | GET    | `/metrics`       | Counters and gauges (optional)   |

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Extension, Router,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use super::middleware::{
    panic_response, request_context, require_csrf, RequestContext, TRACEPARENT, X_API_VERSION,
    X_REQUEST_ID,
};
use super::types::{FileListResponse, HealthResponse, UploadResponse};
use crate::config::{Settings, API_VERSION};
use crate::error::{ApiError, ApiResult};
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::storage::{sanitize_filename, FileStore, MemoryStore};

/// Content type recorded when the upload part carries none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Room for multipart boundaries and part headers on top of the file limit.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub store: Arc<dyn FileStore>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(settings: Settings, store: Arc<dyn FileStore>) -> Self {
        Self {
            settings: Arc::new(settings),
            store,
            metrics: Arc::new(Metrics::new()),
        }
    }
}

/// Start the HTTP server and run until Ctrl+C or SIGTERM.
pub async fn start_server(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let addr = settings.bind_addr()?;
    let prefix = settings.normalized_prefix();
    let state = AppState::new(settings, MemoryStore::shared());
    let app = build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        prefix = %prefix,
        env = %state.settings.environment,
        max_upload_size_bytes = state.settings.max_upload_size_bytes,
        "filedrop API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Full application router with middleware and state applied.
pub fn build_router(state: AppState) -> Router {
    with_layers(routes(&state.settings), state)
}

fn routes(settings: &Settings) -> Router<AppState> {
    let upload_limit = settings
        .max_upload_size_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let mut api = Router::new()
        .route("/health", get(health))
        .route("/files", get(list_files))
        .route("/files/{name}", get(download_file))
        .route(
            "/upload",
            post(upload_file).layer(DefaultBodyLimit::max(upload_limit)),
        );

    if settings.enable_metrics {
        api = api.route("/metrics", get(metrics));
    }

    let prefix = settings.normalized_prefix();
    let mut app = if prefix.is_empty() {
        api
    } else {
        Router::new()
            .route("/health", get(health))
            .nest(&prefix, api)
    };

    if let Some(dir) = &settings.static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

fn with_layers(routes: Router<AppState>, state: AppState) -> Router {
    let cors = cors_layer(&state.settings);

    routes
        .layer(from_fn_with_state(state.clone(), require_csrf))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(from_fn_with_state(state.clone(), request_context))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(settings: &Settings) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            HeaderName::from_static(X_REQUEST_ID),
            HeaderName::from_static(TRACEPARENT),
            HeaderName::from_static(X_API_VERSION),
        ]);

    if settings.frontend_origin == "*" {
        return cors.allow_origin(Any);
    }

    match HeaderValue::from_str(&settings.frontend_origin) {
        Ok(origin) => cors.allow_origin(origin),
        Err(error) => {
            tracing::warn!(
                origin = %settings.frontend_origin,
                %error,
                "unusable FRONTEND_ORIGIN, cross-origin requests will be refused"
            );
            cors
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to install SIGTERM handler");
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

    tracing::info!("signal received, starting graceful shutdown");
}

// =============================================================================
// Handlers
// =============================================================================

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: state.settings.app_name.clone(),
        version: API_VERSION.to_string(),
    })
}

async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

async fn list_files(State(state): State<AppState>) -> ApiResult<Json<FileListResponse>> {
    let files = state.store.list().await?;
    Ok(Json(FileListResponse::new(files)))
}

async fn download_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Response> {
    let file = state.store.get(&name).await?;
    let disposition = format!("attachment; filename=\"{}\"", file.name());

    Ok((
        [
            (header::CONTENT_TYPE, file.meta.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.data,
    )
        .into_response())
}

async fn upload_file(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let limit = state.settings.max_upload_size_bytes;
    let incoming = with_deadline(state.settings.request_timeout(), read_upload(multipart, limit)).await?;

    let name = sanitize_filename(&incoming.file_name).ok_or(ApiError::InvalidFilename)?;
    let meta = state
        .store
        .save(&name, &incoming.content_type, incoming.data)
        .await?;
    state.metrics.record_upload(meta.size);

    tracing::info!(
        request_id = %ctx.request_id,
        original = %incoming.file_name,
        name = %meta.name,
        size = meta.size,
        content_type = %meta.content_type,
        "file stored"
    );

    Ok(Json(UploadResponse::new(meta)))
}

// =============================================================================
// Upload body reading
// =============================================================================

/// The `file` part of an upload, fully buffered.
#[derive(Debug)]
struct IncomingFile {
    file_name: String,
    content_type: String,
    data: Vec<u8>,
}

async fn read_upload(mut multipart: Multipart, limit: usize) -> ApiResult<IncomingFile> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let mut data = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, limit))? {
            if data.len() + chunk.len() > limit {
                return Err(ApiError::TooLarge { limit });
            }
            data.extend_from_slice(&chunk);
        }

        return Ok(IncomingFile {
            file_name,
            content_type,
            data,
        });
    }

    Err(ApiError::MissingFile)
}

fn multipart_error(err: MultipartError, limit: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::TooLarge { limit }
    } else {
        ApiError::InvalidMultipart(err.body_text())
    }
}

/// Fail with [`ApiError::Timeout`] if `fut` does not finish within `limit`.
async fn with_deadline<T>(
    limit: Duration,
    fut: impl Future<Output = ApiResult<T>>,
) -> ApiResult<T> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| ApiError::Timeout)?
}
