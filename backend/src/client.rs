//! Native HTTP client for the Filedrop API.
//!
//! Mirrors what the web frontend does: list files, upload one file at a time
//! as multipart field `file`, and build download links. Dropping an upload
//! future aborts the request.

use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use std::path::Path;

use crate::api::middleware::{X_CSRF_TOKEN, X_REQUEST_ID};
use crate::api::server::DEFAULT_CONTENT_TYPE;
use crate::api::types::{FileListResponse, UploadResponse};
use crate::error::{ClientError, ClientResult};
use crate::logging::new_id;

/// Token sent in `x-csrf-token`; the server only checks presence.
pub const CSRF_TOKEN: &str = "dev";

/// Upload body is handed to the transport in chunks of this size.
const CHUNK_SIZE: usize = 64 * 1024;

/// Bytes handed to the transport so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub sent: u64,
    pub total: u64,
}

impl UploadProgress {
    /// Whole percentage, 0-100. An empty body counts as complete.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.sent.min(self.total) * 100) / self.total) as u8
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    api_base: String,
}

impl ApiClient {
    /// `api_base` is the URL the API routes hang off, e.g.
    /// `http://localhost:8000/api/v1`.
    pub fn new(api_base: &str) -> ClientResult<Self> {
        let api_base = api_base.trim_end_matches('/').to_string();
        Url::parse(&api_base).map_err(|e| ClientError::InvalidBase(format!("{}: {}", api_base, e)))?;

        let http = Client::builder()
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self { http, api_base })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// `GET {api_base}/files`
    pub async fn list_files(&self) -> ClientResult<FileListResponse> {
        let response = self
            .http
            .get(format!("{}/files", self.api_base))
            .header(X_REQUEST_ID, new_id())
            .send()
            .await?;

        Ok(ensure_success(response, "List")?.json().await?)
    }

    /// Upload a file from disk under its own file name.
    pub async fn upload_file<P>(&self, path: &Path, on_progress: P) -> ClientResult<UploadResponse>
    where
        P: Fn(UploadProgress) + Send + Sync + 'static,
    {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin")
            .to_string();

        self.upload_bytes(&file_name, content_type_for(path), data, on_progress)
            .await
    }

    /// `POST {api_base}/upload` with `data` as multipart field `file`.
    pub async fn upload_bytes<P>(
        &self,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
        on_progress: P,
    ) -> ClientResult<UploadResponse>
    where
        P: Fn(UploadProgress) + Send + Sync + 'static,
    {
        let total = data.len() as u64;
        let part = Part::stream_with_length(progress_body(data, on_progress), total)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = Form::new().part("file", part);

        tracing::debug!(file_name, total, "uploading");

        let response = self
            .http
            .post(format!("{}/upload", self.api_base))
            .header(X_REQUEST_ID, new_id())
            .header(X_CSRF_TOKEN, CSRF_TOKEN)
            .multipart(form)
            .send()
            .await?;

        Ok(ensure_success(response, "Upload")?.json().await?)
    }

    /// `{api_base}/files/{name}`, with `name` percent-encoded.
    pub fn download_url(&self, name: &str) -> ClientResult<Url> {
        let mut url = Url::parse(&format!("{}/files", self.api_base))
            .map_err(|e| ClientError::InvalidBase(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBase(self.api_base.clone()))?
            .push(name);
        Ok(url)
    }

    /// Fetch a stored file's bytes.
    pub async fn download(&self, name: &str) -> ClientResult<Vec<u8>> {
        let response = self
            .http
            .get(self.download_url(name)?)
            .header(X_REQUEST_ID, new_id())
            .send()
            .await?;

        Ok(ensure_success(response, "Download")?.bytes().await?.to_vec())
    }
}

fn ensure_success(response: Response, action: &'static str) -> ClientResult<Response> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status {
            action,
            status: status.as_u16(),
        });
    }
    Ok(response)
}

/// Wrap `data` in a streaming body that reports progress as chunks go out.
fn progress_body<P>(data: Vec<u8>, on_progress: P) -> reqwest::Body
where
    P: Fn(UploadProgress) + Send + Sync + 'static,
{
    let total = data.len() as u64;
    let chunks: Vec<Vec<u8>> = data.chunks(CHUNK_SIZE).map(<[u8]>::to_vec).collect();

    on_progress(UploadProgress { sent: 0, total });

    let mut sent = 0u64;
    let stream = futures::stream::iter(chunks).map(move |chunk| {
        sent += chunk.len() as u64;
        on_progress(UploadProgress { sent, total });
        Ok::<_, std::io::Error>(chunk)
    });

    reqwest::Body::wrap_stream(stream)
}

/// MIME type from a file extension, for the handful of types worth naming.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("txt") | Some("log") => "text/plain",
        Some("md") => "text/markdown",
        Some("csv") => "text/csv",
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("json") => "application/json",
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => DEFAULT_CONTENT_TYPE,
    }
}
