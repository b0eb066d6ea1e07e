//! Terraform CLI invocations

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use super::builder::ProcessCommandBuilder;
use super::error::ProcessError;
use super::runner::{ProcessCommand, ProcessOutput, ProcessRunner};

/// Runs `terraform` in a working directory with per-call environment
#[derive(Clone)]
pub struct TerraformRunner {
    runner: Arc<dyn ProcessRunner>,
    binary: String,
    timeout: Duration,
    passthrough_env: Vec<String>,
}

impl TerraformRunner {
    pub fn new(runner: Arc<dyn ProcessRunner>, binary: &str, timeout: Duration) -> Self {
        Self {
            runner,
            binary: binary.to_string(),
            timeout,
            passthrough_env: Vec::new(),
        }
    }

    /// Parent variables (e.g. proxies) terraform should still see
    pub fn with_passthrough_env(mut self, names: Vec<String>) -> Self {
        self.passthrough_env = names;
        self
    }

    pub fn init_command(&self, dir: &Path, env: &HashMap<String, String>) -> ProcessCommand {
        self.command(&["init"], dir, env)
    }

    pub fn apply_command(&self, dir: &Path, env: &HashMap<String, String>) -> ProcessCommand {
        self.command(&["apply", "-auto-approve"], dir, env)
    }

    pub async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        self.runner.run(command).await
    }

    fn command(&self, args: &[&str], dir: &Path, env: &HashMap<String, String>) -> ProcessCommand {
        ProcessCommandBuilder::new(&self.binary)
            .args(args)
            .envs(env)
            .inherit_env(&self.passthrough_env)
            .current_dir(dir)
            .timeout(self.timeout)
            .build()
    }
}
