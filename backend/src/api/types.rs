//! REST API response envelopes.
//!
//! The frontend deserializes these exact shapes, so field names stay
//! snake_case on the wire.

use serde::{Deserialize, Serialize};

use crate::models::FileMeta;

/// Response sent after a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub ok: bool,
    pub file: FileMeta,
}

impl UploadResponse {
    pub fn new(file: FileMeta) -> Self {
        Self { ok: true, file }
    }
}

/// Response for `GET /files`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileListResponse {
    pub ok: bool,
    #[serde(default)]
    pub files: Vec<FileMeta>,
}

impl FileListResponse {
    pub fn new(files: Vec<FileMeta>) -> Self {
        Self { ok: true, files }
    }
}

/// Response for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_response_defaults_files() {
        let parsed: FileListResponse = serde_json::from_str(r#"{"ok": true}"#).unwrap();
        assert!(parsed.ok);
        assert!(parsed.files.is_empty());
    }

    #[test]
    fn test_upload_response_shape() {
        let resp = UploadResponse::new(FileMeta {
            name: "x".into(),
            size: 1,
            content_type: "text/plain".into(),
            uploaded_at: 1.0,
        });
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["file"]["name"], "x");
        assert_eq!(json["file"]["size"], 1);
    }
}
