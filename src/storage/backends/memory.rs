//! In-memory storage backend for testing

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::storage::{
    error::{StorageError, StorageResult},
    traits::ObjectStore,
};

/// In-memory storage backend for testing.
///
/// Keys list in lexicographic order, like S3. Clones share the same objects.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    objects: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
    puts: Arc<AtomicUsize>,
    failing_keys: Arc<RwLock<Vec<String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object without counting it as a write
    pub async fn insert(&self, key: &str, body: impl Into<Vec<u8>>) {
        self.objects
            .write()
            .await
            .insert(key.to_string(), body.into());
    }

    /// Current body of an object, if any
    pub async fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.read().await.get(key).cloned()
    }

    /// Current body of an object as text, if any
    pub async fn text(&self, key: &str) -> Option<String> {
        self.object(key)
            .await
            .map(|body| String::from_utf8_lossy(&body).into_owned())
    }

    /// Number of `put` calls that reached the backend
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Make every `get` for `key` fail with a backend error
    pub async fn fail_reads_of(&self, key: &str) {
        self.failing_keys.write().await.push(key.to_string());
    }
}

#[async_trait]
impl ObjectStore for MemoryBackend {
    async fn list_keys(&self, prefix: &str) -> StorageResult<Vec<String>> {
        Ok(self
            .objects
            .read()
            .await
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
        if self.failing_keys.read().await.iter().any(|k| k == key) {
            return Err(StorageError::backend(format!("injected failure for '{key}'")));
        }
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::not_found(key))
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> StorageResult<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.objects.write().await.insert(key.to_string(), body);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
