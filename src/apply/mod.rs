//! Apply orchestration
//!
//! Materialises a user's stored Terraform files in a local workspace and runs
//! `terraform init` and `terraform apply -auto-approve` there. The credential
//! path reaches terraform through the child environment only.

pub mod config;
pub mod orchestrator;
pub mod report;


pub use config::ApplyConfig;
pub use orchestrator::{ApplyError, ApplyOrchestrator};
pub use report::{ApplyReport, StepOutcome};
