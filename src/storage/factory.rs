//! Storage factory for creating object store instances

use std::sync::Arc;

use super::backends::{FileBackend, MemoryBackend, S3Backend};
use super::config::{BackendType, StorageConfig};
use super::error::{StorageError, StorageResult};
use super::traits::ObjectStore;

/// Factory for creating object stores
pub struct StorageFactory;

impl StorageFactory {
    /// Create an object store from explicit configuration
    pub async fn from_config(config: &StorageConfig) -> StorageResult<Arc<dyn ObjectStore>> {
        match config.backend {
            BackendType::S3 => Ok(Arc::new(S3Backend::new(config).await?)),
            BackendType::File => {
                let root = config.root.as_ref().ok_or_else(|| {
                    StorageError::configuration("storage.root is required for the file backend")
                })?;
                Ok(Arc::new(FileBackend::new(root).await?))
            }
            BackendType::Memory => Ok(Arc::new(MemoryBackend::new())),
        }
    }
}
