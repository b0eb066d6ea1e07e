//! Error types for the object store gateway

use std::fmt;
use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Local I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Object does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Object body is not valid UTF-8 text
    #[error("Object '{key}' is not valid UTF-8: {reason}")]
    Decode { key: String, reason: String },

    /// Backend request failed
    #[error("Backend error: {0}")]
    Backend(String),

    /// Connection to the backend failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl StorageError {
    /// Create a not found error
    pub fn not_found<E: fmt::Display>(item: E) -> Self {
        Self::NotFound(item.to_string())
    }

    /// Create a backend error
    pub fn backend<E: fmt::Display>(msg: E) -> Self {
        Self::Backend(msg.to_string())
    }

    /// Create a connection error
    pub fn connection<E: fmt::Display>(msg: E) -> Self {
        Self::Connection(msg.to_string())
    }

    /// Create a configuration error
    pub fn configuration<E: fmt::Display>(msg: E) -> Self {
        Self::Configuration(msg.to_string())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
