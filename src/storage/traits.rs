//! Core trait for raw object store backends

use async_trait::async_trait;

use super::error::StorageResult;

/// Raw blob access. Policy (reserved names, directory markers) lives in
/// [`ObjectGateway`](super::gateway::ObjectGateway), not in backends.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Every key under `prefix`, in the backend's listing order
    async fn list_keys(&self, prefix: &str) -> StorageResult<Vec<String>>;

    /// Fetch an object's body. Missing objects are `StorageError::NotFound`.
    async fn get(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Create or replace an object
    async fn put(&self, key: &str, body: Vec<u8>) -> StorageResult<()>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}
