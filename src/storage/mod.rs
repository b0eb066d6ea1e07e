//! Object store gateway for user Terraform files and reference documents
//!
//! Raw blob access goes through the [`ObjectStore`] trait (S3, local
//! directory, or memory). [`ObjectGateway`] layers the key policy on top:
//! reserved Terraform files are never listed for translation and never
//! overwritten, and downloads special-case the credential file.

pub mod backends;
pub mod config;
pub mod error;
pub mod factory;
pub mod gateway;
pub mod keys;
pub mod traits;


pub use backends::{FileBackend, MemoryBackend, S3Backend};
pub use config::{BackendType, StorageConfig};
pub use error::{StorageError, StorageResult};
pub use factory::StorageFactory;
pub use gateway::{DownloadFailure, DownloadReport, ObjectGateway, WriteOutcome};
pub use keys::{derive_target_key, Platform, RESERVED_FILENAMES};
pub use traits::ObjectStore;
