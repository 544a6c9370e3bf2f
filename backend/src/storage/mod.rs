//! File store - holds uploaded files keyed by sanitized name.
//!
//! The API only talks to the [`FileStore`] trait. [`MemoryStore`] is the one
//! implementation; it keeps everything in process memory and loses it on
//! restart.

mod filename;

pub use filename::sanitize_filename;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::models::{epoch_seconds, FileMeta, StoredFile};

/// Storage backend used by the HTTP API.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store `data` under `name`, replacing any previous file of that name.
    async fn save(&self, name: &str, content_type: &str, data: Vec<u8>) -> StoreResult<FileMeta>;

    /// All stored files, newest first.
    async fn list(&self) -> StoreResult<Vec<FileMeta>>;

    /// Fetch a file with its content.
    async fn get(&self, name: &str) -> StoreResult<StoredFile>;

    /// Drop every file.
    async fn clear(&self) -> StoreResult<()>;
}

/// In-memory [`FileStore`].
#[derive(Default)]
pub struct MemoryStore {
    files: RwLock<HashMap<String, StoredFile>>,
    next_seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<dyn FileStore> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn save(&self, name: &str, content_type: &str, data: Vec<u8>) -> StoreResult<FileMeta> {
        let meta = FileMeta {
            name: name.to_string(),
            size: data.len() as u64,
            content_type: content_type.to_string(),
            uploaded_at: epoch_seconds(),
        };
        let stored = StoredFile {
            meta: meta.clone(),
            data,
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
        };

        self.files.write().await.insert(name.to_string(), stored);
        Ok(meta)
    }

    async fn list(&self) -> StoreResult<Vec<FileMeta>> {
        let files = self.files.read().await;
        let mut entries: Vec<&StoredFile> = files.values().collect();

        // Newest first; insertion order settles equal timestamps
        entries.sort_by(|a, b| {
            b.meta
                .uploaded_at
                .total_cmp(&a.meta.uploaded_at)
                .then(b.seq.cmp(&a.seq))
        });

        Ok(entries.into_iter().map(|f| f.meta.clone()).collect())
    }

    async fn get(&self, name: &str) -> StoreResult<StoredFile> {
        self.files
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn clear(&self) -> StoreResult<()> {
        self.files.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_then_list() {
        let store = MemoryStore::new();
        store.save("a.txt", "text/plain", b"hi".to_vec()).await.unwrap();

        let files = store.list().await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "a.txt");
        assert_eq!(files[0].size, 2);
        assert_eq!(files[0].content_type, "text/plain");
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = MemoryStore::new();
        for name in ["a.txt", "b.txt", "c.txt"] {
            store.save(name, "text/plain", b"x".to_vec()).await.unwrap();
        }

        let names: Vec<_> = store.list().await.unwrap().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["c.txt", "b.txt", "a.txt"]);
    }

    #[tokio::test]
    async fn test_same_name_replaces() {
        let store = MemoryStore::new();
        store.save("a.txt", "text/plain", b"one".to_vec()).await.unwrap();
        store.save("a.txt", "text/markdown", b"second".to_vec()).await.unwrap();

        let files = store.list().await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].size, 6);

        let stored = store.get("a.txt").await.unwrap();
        assert_eq!(stored.data, b"second");
        assert_eq!(stored.meta.content_type, "text/markdown");
    }

    #[tokio::test]
    async fn test_get_missing_and_clear() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get("nope").await,
            Err(StoreError::NotFound(ref n)) if n == "nope"
        ));

        store.save("a.txt", "text/plain", vec![]).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }
}
