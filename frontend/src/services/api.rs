//! HTTP client for the Filedrop API.
//!
//! Two calls (list, upload) and a link builder for downloads. Both calls
//! take an optional `AbortSignal`; a request aborted through its own signal
//! comes back as [`AppError::Cancelled`].

use gloo_net::http::{Request, Response};
use web_sys::{AbortSignal, File, FormData};

use crate::config::{API_BASE, CSRF_TOKEN};
use crate::types::{new_request_id, AppError, AppResult, FileListResponse, UploadResponse};

const X_REQUEST_ID: &str = "x-request-id";
const X_CSRF_TOKEN: &str = "x-csrf-token";

/// `GET {API_BASE}/files`
pub async fn list_files(signal: Option<&AbortSignal>) -> AppResult<FileListResponse> {
    let response = Request::get(&format!("{}/files", API_BASE))
        .header(X_REQUEST_ID, &new_request_id())
        .abort_signal(signal)
        .send()
        .await
        .map_err(|e| send_error(e, is_aborted(signal)))?;

    ensure_ok(&response, "List")?;

    response
        .json::<FileListResponse>()
        .await
        .map_err(|e| read_error(e, is_aborted(signal)))
}

/// `POST {API_BASE}/upload` with `file` as multipart field `file`.
///
/// `on_progress` gets 0 when the request goes out and 100 once the server
/// accepted the file; fetch reports nothing in between.
pub async fn upload_file(
    file: &File,
    on_progress: impl Fn(u8),
    signal: Option<&AbortSignal>,
) -> AppResult<UploadResponse> {
    let form = FormData::new().map_err(|e| AppError::Browser(format!("FormData: {:?}", e)))?;
    form.append_with_blob_and_filename("file", file, &file.name())
        .map_err(|e| AppError::Browser(format!("FormData append: {:?}", e)))?;

    let request = Request::post(&format!("{}/upload", API_BASE))
        .header(X_REQUEST_ID, &new_request_id())
        .header(X_CSRF_TOKEN, CSRF_TOKEN)
        .abort_signal(signal)
        .body(form)
        .map_err(|e| AppError::Browser(e.to_string()))?;

    on_progress(0);

    let response = request
        .send()
        .await
        .map_err(|e| send_error(e, is_aborted(signal)))?;

    ensure_ok(&response, "Upload")?;

    let uploaded = response
        .json::<UploadResponse>()
        .await
        .map_err(|e| read_error(e, is_aborted(signal)))?;

    on_progress(100);
    Ok(uploaded)
}

/// `{API_BASE}/files/{name}` with the name percent-encoded.
pub fn download_url(name: &str) -> String {
    format!("{}/files/{}", API_BASE, urlencoding::encode(name))
}

fn ensure_ok(response: &Response, action: &'static str) -> AppResult<()> {
    if !response.ok() {
        return Err(AppError::Status {
            action,
            status: response.status(),
        });
    }
    Ok(())
}

fn is_aborted(signal: Option<&AbortSignal>) -> bool {
    signal.map(AbortSignal::aborted).unwrap_or(false)
}

fn send_error(err: gloo_net::Error, aborted: bool) -> AppError {
    if aborted {
        AppError::Cancelled
    } else {
        AppError::Network(err.to_string())
    }
}

/// The body read fails too when the signal fires after the headers arrived.
fn read_error(err: gloo_net::Error, aborted: bool) -> AppError {
    if aborted {
        AppError::Cancelled
    } else {
        AppError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_url_encodes_name() {
        assert_eq!(
            download_url("report 1#final.pdf"),
            format!("{}/files/report%201%23final.pdf", API_BASE)
        );
        assert_eq!(download_url("a.txt"), format!("{}/files/a.txt", API_BASE));
    }

    #[test]
    fn test_send_error_after_abort_is_cancelled() {
        let err = gloo_net::Error::GlooError("The user aborted a request.".into());
        assert_eq!(send_error(err, true), AppError::Cancelled);
    }

    #[test]
    fn test_body_read_after_abort_is_cancelled() {
        let err = gloo_net::Error::GlooError("AbortError: The operation was aborted.".into());
        assert_eq!(read_error(err, true), AppError::Cancelled);
        assert!(read_error(gloo_net::Error::GlooError("x".into()), true).is_cancelled());
    }

    #[test]
    fn test_body_read_error_is_decode_otherwise() {
        let err = gloo_net::Error::GlooError("expected value at line 1".into());
        assert!(matches!(read_error(err, false), AppError::Decode(msg) if msg.contains("expected value")));
    }

    #[test]
    fn test_send_error_is_network_otherwise() {
        let err = gloo_net::Error::GlooError("connection refused".into());
        assert!(matches!(send_error(err, false), AppError::Network(msg) if msg.contains("refused")));
    }
}
