//! Domain models for stored files.

use serde::{Deserialize, Serialize};

/// Public metadata for an uploaded file.
///
/// This is the record the API lists and returns after an upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMeta {
    /// Sanitized file name, unique within the store
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// MIME type as sent by the uploader
    pub content_type: String,
    /// Epoch seconds
    pub uploaded_at: f64,
}

impl FileMeta {
    /// Size as shown in listings, e.g. `1.5 KB`.
    pub fn size_kb(&self) -> String {
        format!("{:.1} KB", self.size as f64 / 1024.0)
    }

    /// Upload time in the local timezone.
    pub fn uploaded_at_local(&self) -> String {
        let micros = (self.uploaded_at * 1_000_000.0) as i64;
        chrono::DateTime::from_timestamp_micros(micros)
            .map(|t| {
                t.with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_else(|| "-".to_string())
    }
}

/// A file held by a store: metadata plus content.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub meta: FileMeta,
    pub data: Vec<u8>,
    /// Insertion sequence, breaks ties between equal timestamps
    pub(crate) seq: u64,
}

impl StoredFile {
    pub fn name(&self) -> &str {
        &self.meta.name
    }
}

/// Current wall-clock time as fractional epoch seconds.
pub fn epoch_seconds() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_meta_wire_names() {
        let meta = FileMeta {
            name: "x".into(),
            size: 1,
            content_type: "text/plain".into(),
            uploaded_at: 1.0,
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["name"], "x");
        assert_eq!(json["content_type"], "text/plain");
        assert_eq!(json["uploaded_at"], 1.0);
    }

    #[test]
    fn test_size_kb() {
        let mut meta = FileMeta {
            name: "x".into(),
            size: 1536,
            content_type: "text/plain".into(),
            uploaded_at: 0.0,
        };
        assert_eq!(meta.size_kb(), "1.5 KB");
        meta.size = 0;
        assert_eq!(meta.size_kb(), "0.0 KB");
    }

    #[test]
    fn test_uploaded_at_local_formats() {
        let meta = FileMeta {
            name: "x".into(),
            size: 1,
            content_type: "text/plain".into(),
            uploaded_at: 1_700_000_000.5,
        };
        let shown = meta.uploaded_at_local();
        assert_eq!(shown.len(), "2023-11-14 22:13:20".len());
        assert!(shown.starts_with("2023-11-1"));
    }

    #[test]
    fn test_epoch_seconds_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(epoch_seconds() > 1_577_836_800.0);
    }
}
