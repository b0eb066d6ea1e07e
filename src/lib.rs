//! # cloudport
//!
//! Translates a user's AWS Terraform files into GCP Terraform with a hosted
//! Bedrock model and applies the result with the `terraform` CLI.
//!
//! ## Modules
//!
//! - `storage` - Object store gateway over S3, a local directory or memory
//! - `reference` - Reference document selection and text extraction
//! - `model` - Prompting, model clients and retry with backoff
//! - `translate` - Batch translation with paced model calls and per-file outcomes
//! - `subprocess` - Mockable process execution and terraform invocations
//! - `apply` - Workspace download and `terraform init` / `apply`
//! - `server` - HTTP API
//! - `app` - Wiring, logging and fatal error handling
//! - `config` - Layered configuration
pub mod app;
pub mod apply;
pub mod config;
pub mod error;
pub mod model;
pub mod reference;
pub mod server;
pub mod storage;
pub mod subprocess;
pub mod translate;

pub use error::{Error, Result};
