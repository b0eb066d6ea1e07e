//! S3 storage backend implementation

use super::super::config::StorageConfig;
use super::super::error::{StorageError, StorageResult};
use super::super::traits::ObjectStore;
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::sync::Arc;
use tracing::{debug, info};

/// S3 storage backend
pub struct S3Backend {
    client: Arc<Client>,
    bucket: String,
}

impl S3Backend {
    /// Create new S3 backend
    pub async fn new(config: &StorageConfig) -> StorageResult<Self> {
        info!(bucket = %config.bucket, "Initializing S3 backend");

        let aws_config = if let Some(ref endpoint) = config.endpoint {
            aws_config::from_env().endpoint_url(endpoint).load().await
        } else {
            aws_config::load_from_env().await
        };

        let client = Client::new(&aws_config);

        client
            .head_bucket()
            .bucket(&config.bucket)
            .send()
            .await
            .map_err(|e| {
                StorageError::connection(format!(
                    "Failed to access S3 bucket '{}': {}",
                    config.bucket,
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(Self::from_client(client, &config.bucket))
    }

    /// Wrap an already configured client
    pub fn from_client(client: Client, bucket: &str) -> Self {
        Self {
            client: Arc::new(client),
            bucket: bucket.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Backend {
    async fn list_keys(&self, prefix: &str) -> StorageResult<Vec<String>> {
        debug!("Listing objects under s3://{}/{}", self.bucket, prefix);

        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let page = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| {
                    StorageError::backend(format!(
                        "Failed to list '{}': {}",
                        prefix,
                        DisplayErrorContext(&e)
                    ))
                })?;

            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_string)),
            );

            match page.next_continuation_token() {
                Some(token) if page.is_truncated().unwrap_or(false) => {
                    continuation = Some(token.to_string());
                }
                _ => break,
            }
        }

        Ok(keys)
    }

    async fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
        debug!("Fetching s3://{}/{}", self.bucket, key);

        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let no_such_key = e
                    .as_service_error()
                    .map(|service| service.is_no_such_key())
                    .unwrap_or(false);
                if no_such_key {
                    StorageError::not_found(key)
                } else {
                    StorageError::backend(format!(
                        "Failed to fetch '{}': {}",
                        key,
                        DisplayErrorContext(&e)
                    ))
                }
            })?;

        let bytes = result
            .body
            .collect()
            .await
            .map_err(|e| StorageError::backend(format!("Failed to read '{}': {}", key, e)))?
            .into_bytes();

        Ok(bytes.to_vec())
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> StorageResult<()> {
        debug!("Saving s3://{}/{} ({} bytes)", self.bucket, key, body.len());

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                StorageError::backend(format!(
                    "Failed to save '{}': {}",
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "s3"
    }
}
