use serde::Serialize;
use std::path::PathBuf;

use crate::storage::{DownloadFailure, Platform};

/// Lines of stderr kept per step
pub const STDERR_TAIL_LINES: usize = 20;

/// One terraform invocation
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub command: String,
    /// `None` when the process never produced an exit code
    pub exit_code: Option<i32>,
    pub duration_ms: u64,
    pub stderr_tail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepOutcome {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0) && self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplyReport {
    pub user: String,
    pub platform: Platform,
    pub workspace: PathBuf,
    pub downloaded: Vec<PathBuf>,
    pub download_failures: Vec<DownloadFailure>,
    pub steps: Vec<StepOutcome>,
    pub succeeded: bool,
}

impl ApplyReport {
    pub fn summary(&self) -> String {
        if self.succeeded {
            return format!(
                "Terraform apply completed for {} ({} files).",
                self.user,
                self.downloaded.len()
            );
        }
        match self.steps.iter().find(|step| !step.succeeded()) {
            Some(step) => match (&step.error, step.exit_code) {
                (Some(error), _) => format!("'{}' could not run: {}", step.command, error),
                (None, Some(code)) => format!("'{}' failed with exit code {}.", step.command, code),
                (None, None) => format!("'{}' was terminated.", step.command),
            },
            None => "Terraform apply did not run.".to_string(),
        }
    }
}

/// Last `lines` lines of `text`
pub fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_keeps_last_lines() {
        assert_eq!(tail("a\nb\nc\n", 2), "b\nc");
        assert_eq!(tail("only", 5), "only");
        assert_eq!(tail("", 3), "");
    }

    #[test]
    fn test_summary_names_failing_step() {
        let report = ApplyReport {
            user: "u1".into(),
            platform: Platform::Gcp,
            workspace: PathBuf::from("/tmp/u1/terraform"),
            downloaded: Vec::new(),
            download_failures: Vec::new(),
            steps: vec![StepOutcome {
                command: "terraform init".into(),
                exit_code: Some(1),
                duration_ms: 12,
                stderr_tail: "Error: provider".into(),
                error: None,
            }],
            succeeded: false,
        };
        assert_eq!(report.summary(), "'terraform init' failed with exit code 1.");
    }
}
