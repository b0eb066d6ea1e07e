//! Subprocess execution behind a mockable runner

pub mod builder;
pub mod error;
pub mod mock;
pub mod runner;
pub mod terraform;

#[cfg(test)]
mod tests;

pub use builder::ProcessCommandBuilder;
pub use error::ProcessError;
pub use mock::{MockCommandConfig, MockProcessRunner};
pub use runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner, TokioProcessRunner};
pub use terraform::TerraformRunner;
