//! Request middleware: request/trace ids, request logging, CSRF gate and
//! panic recovery.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use std::any::Any;
use std::time::Instant;

use super::server::AppState;
use crate::config::API_VERSION;
use crate::error::{error_body, ApiError};
use crate::logging::new_id;

pub const X_REQUEST_ID: &str = "x-request-id";
pub const TRACEPARENT: &str = "traceparent";
pub const X_API_VERSION: &str = "x-api-version";
pub const X_CSRF_TOKEN: &str = "x-csrf-token";

/// Ids attached to every request, readable by handlers as an `Extension`.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub trace_id: String,
}

/// Marker left on responses produced by [`panic_response`].
#[derive(Debug, Clone)]
struct Unhandled(String);

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Trace id from a W3C `traceparent` header (`00-<trace>-<span>-<flags>`).
pub fn parse_trace_id(traceparent: &str) -> Option<String> {
    let trace = traceparent.split('-').nth(1)?;
    let valid = trace.len() == 32 && trace.chars().all(|c| c.is_ascii_hexdigit());
    valid.then(|| trace.to_ascii_lowercase())
}

/// Assign ids, track the in-progress gauge, log completion and stamp the
/// tracing headers on the response.
pub async fn request_context(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let request_id = header_str(request.headers(), X_REQUEST_ID)
        .map(str::to_string)
        .unwrap_or_else(new_id);
    let trace_id = header_str(request.headers(), TRACEPARENT)
        .and_then(parse_trace_id)
        .unwrap_or_else(new_id);
    let path = request.uri().path().to_string();

    request.extensions_mut().insert(RequestContext {
        request_id: request_id.clone(),
        trace_id: trace_id.clone(),
    });

    let _in_progress = state.metrics.track_request();
    let started = Instant::now();

    let mut response = next.run(request).await;

    let duration_ms = started.elapsed().as_millis() as u64;
    if let Some(Unhandled(detail)) = response.extensions().get::<Unhandled>() {
        tracing::error!(%request_id, %trace_id, %path, %detail, "unhandled");
    }
    tracing::info!(
        %request_id,
        %trace_id,
        %path,
        status_code = response.status().as_u16(),
        duration_ms,
        "request done"
    );

    let headers = response.headers_mut();
    if let Ok(v) = HeaderValue::from_str(&request_id) {
        headers.insert(X_REQUEST_ID, v);
    }
    if let Ok(v) = HeaderValue::from_str(&format!("00-{}-0000000000000000-01", trace_id)) {
        headers.insert(TRACEPARENT, v);
    }
    headers.insert(X_API_VERSION, HeaderValue::from_static(API_VERSION));

    response
}

/// Reject POSTs without an `x-csrf-token` header when the feature is on.
pub async fn require_csrf(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if state.settings.require_csrf_header
        && request.method() == Method::POST
        && header_str(request.headers(), X_CSRF_TOKEN).is_none()
    {
        return Err(ApiError::CsrfMissing);
    }
    Ok(next.run(request).await)
}

/// Turn a handler panic into the generic 500 envelope.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    let mut response = (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(error_body("internal_error")),
    )
        .into_response();
    response.extensions_mut().insert(Unhandled(detail));
    response
}
