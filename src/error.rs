use thiserror::Error;

use crate::apply::ApplyError;
use crate::config::ConfigError;
use crate::model::ModelError;
use crate::reference::ReferenceError;
use crate::storage::StorageError;
use crate::subprocess::ProcessError;
use crate::translate::TranslateError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Reference document error: {0}")]
    Reference(#[from] ReferenceError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    #[error("Translation error: {0}")]
    Translate(#[from] TranslateError),

    #[error("Apply error: {0}")]
    Apply(#[from] ApplyError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Process exit code for the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => 2,
            Error::Translate(TranslateError::Validation(_)) | Error::Apply(ApplyError::Validation(_)) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
