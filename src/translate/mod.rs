//! Batch translation orchestration
//!
//! Walks a user's source folder, translates each file through the model with
//! paced requests, and records a typed outcome per file.

pub mod config;
pub mod orchestrator;
pub mod outcome;
pub mod pacing;


pub use config::TranslationConfig;
pub use orchestrator::{TranslateError, TranslationOrchestrator};
pub use outcome::{BatchReport, FileOutcome, FileStatus, SkipReason, TranslationOutcome};
pub use pacing::RequestPacer;
