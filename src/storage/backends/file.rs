//! File-based storage backend: one file per object, keys map to relative paths

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::storage::{
    error::{StorageError, StorageResult},
    traits::ObjectStore,
};

/// Directory tree mirroring object keys
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Create a file backend rooted at `root`, creating it if needed
    pub async fn new(root: &Path) -> StorageResult<Self> {
        fs::create_dir_all(root).await?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        if key.split('/').any(|segment| segment == "..") {
            return Err(StorageError::configuration(format!(
                "key '{key}' escapes the storage root"
            )));
        }
        Ok(self.root.join(key.trim_start_matches('/')))
    }

    fn key_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }

    async fn walk(&self, dir: PathBuf, keys: &mut Vec<String>) -> StorageResult<()> {
        let mut pending = vec![dir];
        while let Some(dir) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if entry.file_type().await?.is_dir() {
                    pending.push(path);
                } else if let Some(key) = self.key_for(&path) {
                    keys.push(key);
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for FileBackend {
    async fn list_keys(&self, prefix: &str) -> StorageResult<Vec<String>> {
        // Walk from the deepest directory the prefix names, then filter by prefix.
        let dir_part = match prefix.rfind('/') {
            Some(idx) => &prefix[..idx],
            None => "",
        };
        let start = self.path_for(dir_part)?;

        let mut keys = Vec::new();
        self.walk(start, &mut keys).await?;
        keys.retain(|key| key.starts_with(prefix));
        keys.sort();
        Ok(keys)
    }

    async fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::not_found(key))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> StorageResult<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        debug!("Writing {} bytes to {:?}", body.len(), path);
        fs::write(&path, body).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_put_get_and_list_under_prefix() {
        let temp = TempDir::new().unwrap();
        let backend = FileBackend::new(temp.path()).await.unwrap();

        backend
            .put("users/u1/aws/vpc.tf", b"resource {}".to_vec())
            .await
            .unwrap();
        backend
            .put("users/u1/aws/nested/eip.tf", b"eip".to_vec())
            .await
            .unwrap();
        backend
            .put("users/u2/aws/other.tf", b"x".to_vec())
            .await
            .unwrap();

        let keys = backend.list_keys("users/u1/aws/").await.unwrap();
        assert_eq!(
            keys,
            vec![
                "users/u1/aws/nested/eip.tf".to_string(),
                "users/u1/aws/vpc.tf".to_string()
            ]
        );
        assert_eq!(
            backend.get("users/u1/aws/vpc.tf").await.unwrap(),
            b"resource {}"
        );
    }

    #[tokio::test]
    async fn test_missing_prefix_lists_nothing() {
        let temp = TempDir::new().unwrap();
        let backend = FileBackend::new(temp.path()).await.unwrap();
        assert!(backend.list_keys("users/ghost/aws/").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_object_is_not_found() {
        let temp = TempDir::new().unwrap();
        let backend = FileBackend::new(temp.path()).await.unwrap();
        let err = backend.get("rag/vpc.pdf").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_parent_traversal_rejected() {
        let temp = TempDir::new().unwrap();
        let backend = FileBackend::new(temp.path()).await.unwrap();
        assert!(backend.put("../escape.tf", Vec::new()).await.is_err());
    }
}
