//! Storage configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storage backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    /// Amazon S3 or an S3-compatible endpoint (default)
    #[default]
    S3,
    /// Directory tree mirroring object keys
    File,
    /// Memory storage (for testing)
    Memory,
}

impl std::str::FromStr for BackendType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "s3" => Ok(Self::S3),
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown storage backend '{other}'")),
        }
    }
}

/// Object store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage backend type
    #[serde(default)]
    pub backend: BackendType,

    /// Bucket holding user files and reference documents
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Custom endpoint for S3-compatible stores
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Root directory for the file backend
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Key prefix for per-user folders
    #[serde(default = "default_users_prefix")]
    pub users_prefix: String,

    /// Key prefix for reference documents
    #[serde(default = "default_reference_prefix")]
    pub reference_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendType::default(),
            bucket: default_bucket(),
            endpoint: None,
            root: None,
            users_prefix: default_users_prefix(),
            reference_prefix: default_reference_prefix(),
        }
    }
}

fn default_bucket() -> String {
    "aiwa-terraform".to_string()
}

fn default_users_prefix() -> String {
    "users".to_string()
}

fn default_reference_prefix() -> String {
    "rag".to_string()
}
