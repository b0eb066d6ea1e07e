use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::error::ProcessError;
use super::runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner};

type ArgsMatcher = Box<dyn Fn(&[String]) -> bool + Send + Sync>;

/// Records commands and answers them from registered expectations.
///
/// The first expectation whose program and argument matcher accept a command
/// answers it; a command nothing matches is an error.
#[derive(Clone, Default)]
pub struct MockProcessRunner {
    expectations: Arc<Mutex<Vec<MockExpectation>>>,
    calls: Arc<Mutex<Vec<ProcessCommand>>>,
}

struct MockExpectation {
    program: String,
    args: Option<ArgsMatcher>,
    response: ProcessOutput,
}

impl MockExpectation {
    fn accepts(&self, command: &ProcessCommand) -> bool {
        self.program == command.program
            && self.args.as_ref().map_or(true, |matches| matches(&command.args))
    }
}

pub struct MockCommandConfig {
    runner: MockProcessRunner,
    expectation: MockExpectation,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an expectation for `program`; it succeeds with empty output unless configured
    pub fn expect_command(&mut self, program: &str) -> MockCommandConfig {
        MockCommandConfig {
            runner: self.clone(),
            expectation: MockExpectation {
                program: program.to_string(),
                args: None,
                response: ProcessOutput {
                    status: ExitStatus::Success,
                    stdout: String::new(),
                    stderr: String::new(),
                    duration: Duration::from_millis(10),
                },
            },
        }
    }

    pub fn verify_called(&self, program: &str, times: usize) -> bool {
        lock(&self.calls)
            .iter()
            .filter(|cmd| cmd.program == program)
            .count()
            == times
    }

    /// Whether any recorded call ran `program` with exactly `args`
    pub fn was_called_with(&self, program: &str, args: &[&str]) -> bool {
        lock(&self.calls)
            .iter()
            .any(|cmd| cmd.program == program && cmd.args == args)
    }

    pub fn get_call_history(&self) -> Vec<ProcessCommand> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl ProcessRunner for MockProcessRunner {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        lock(&self.calls).push(command.clone());

        lock(&self.expectations)
            .iter()
            .find(|expectation| expectation.accepts(&command))
            .map(|expectation| expectation.response.clone())
            .ok_or_else(|| {
                ProcessError::MockExpectationNotMet(format!(
                    "No expectation found for command: {}",
                    command.display()
                ))
            })
    }
}

impl MockCommandConfig {
    pub fn with_args<F>(mut self, matcher: F) -> Self
    where
        F: Fn(&[String]) -> bool + Send + Sync + 'static,
    {
        self.expectation.args = Some(Box::new(matcher));
        self
    }

    pub fn returns_stderr(mut self, stderr: &str) -> Self {
        self.expectation.response.stderr = stderr.to_string();
        self
    }

    pub fn returns_exit_code(mut self, code: i32) -> Self {
        self.expectation.response.status = match code {
            0 => ExitStatus::Success,
            code => ExitStatus::Error(code),
        };
        self
    }

    pub fn finish(self) {
        lock(&self.runner.expectations).push(self.expectation);
    }
}
