//! Object store gateway: key policy on top of a raw [`ObjectStore`]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tokio::fs;
use tracing::{debug, info, warn};

use super::error::{StorageError, StorageResult};
use super::keys::{self, CREDENTIAL_FILENAME};
use super::traits::ObjectStore;

/// Sub-directory of a download target that receives the credential file
pub const CREDENTIAL_DIR: &str = "key";

/// Result of a guarded write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// Target was a reserved Terraform file and was left untouched
    SkippedReserved,
}

/// Files fetched by [`ObjectGateway::download_all`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct DownloadReport {
    pub downloaded: Vec<PathBuf>,
    pub failures: Vec<DownloadFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DownloadFailure {
    pub key: String,
    pub reason: String,
}

/// Lists, reads and writes user artifacts with the reserved-name policy applied
#[derive(Clone)]
pub struct ObjectGateway {
    store: Arc<dyn ObjectStore>,
}

impl ObjectGateway {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> Arc<dyn ObjectStore> {
        Arc::clone(&self.store)
    }

    /// Translatable keys under `prefix`: no directory markers, no reserved files
    pub async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let keys: Vec<String> = self
            .store
            .list_keys(prefix)
            .await?
            .into_iter()
            .filter(|key| !keys::is_directory_marker(key) && !keys::is_reserved(key))
            .collect();

        debug!(
            backend = self.store.name(),
            "Found {} eligible files under '{}'",
            keys.len(),
            prefix
        );
        for key in &keys {
            debug!(" - {}", key);
        }
        Ok(keys)
    }

    /// Object body decoded as UTF-8
    pub async fn read_text(&self, key: &str) -> StorageResult<String> {
        let body = self.store.get(key).await?;
        String::from_utf8(body).map_err(|e| StorageError::Decode {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    /// Raw object body
    pub async fn read_bytes(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.store.get(key).await
    }

    /// Upsert `content` at `key` unless the key names a reserved Terraform file
    pub async fn write_text(&self, key: &str, content: &str) -> StorageResult<WriteOutcome> {
        if keys::is_reserved(key) {
            warn!("Skipping save for reserved file '{}'", key);
            return Ok(WriteOutcome::SkippedReserved);
        }

        self.store.put(key, content.as_bytes().to_vec()).await?;
        info!("Saved '{}' ({} bytes)", key, content.len());
        Ok(WriteOutcome::Written)
    }

    /// Fetch every object under `prefix` into `local_dir`, flattened to file names.
    ///
    /// `credential.json` lands in `local_dir/key/`. A failing object is recorded
    /// and the rest of the batch continues; only a failed listing is an error.
    pub async fn download_all(&self, prefix: &str, local_dir: &Path) -> StorageResult<DownloadReport> {
        let keys: Vec<String> = self
            .store
            .list_keys(prefix)
            .await?
            .into_iter()
            .filter(|key| !keys::is_directory_marker(key))
            .collect();

        fs::create_dir_all(local_dir).await?;

        let mut report = DownloadReport::default();
        for key in keys {
            let file_name = keys::file_name(&key);
            let target = if file_name == CREDENTIAL_FILENAME {
                local_dir.join(CREDENTIAL_DIR).join(file_name)
            } else {
                local_dir.join(file_name)
            };

            debug!("Downloading '{}' to {:?}", key, target);
            match self.download_one(&key, &target).await {
                Ok(()) => report.downloaded.push(target),
                Err(e) => {
                    warn!("Error downloading '{}': {}", key, e);
                    report.failures.push(DownloadFailure {
                        key,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Downloaded {} files from '{}' ({} failed)",
            report.downloaded.len(),
            prefix,
            report.failures.len()
        );
        Ok(report)
    }

    async fn download_one(&self, key: &str, target: &Path) -> StorageResult<()> {
        let body = self.store.get(key).await?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(target, body).await?;
        Ok(())
    }
}
