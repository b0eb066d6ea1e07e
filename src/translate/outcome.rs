//! Typed per-file and per-batch results

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::storage::Platform;

/// Why a file was passed over without calling the model or writing a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    EmptySource,
    SourceUnreadable,
    ReferenceUnavailable,
    EmptyTranslation,
    ReservedTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Translated {
        bytes: usize,
    },
    Skipped {
        reason: SkipReason,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub source_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_key: Option<String>,
    #[serde(flatten)]
    pub status: FileStatus,
}

impl FileOutcome {
    pub fn skipped(source_key: &str, reason: SkipReason, detail: Option<String>) -> Self {
        Self {
            source_key: source_key.to_string(),
            target_key: None,
            status: FileStatus::Skipped { reason, detail },
        }
    }

    pub fn failed(source_key: &str, target_key: Option<String>, reason: String) -> Self {
        Self {
            source_key: source_key.to_string(),
            target_key,
            status: FileStatus::Failed { reason },
        }
    }

    pub fn is_translated(&self) -> bool {
        matches!(self.status, FileStatus::Translated { .. })
    }
}

/// Everything that happened during one batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub user: String,
    pub source_platform: Platform,
    pub target_platform: Platform,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub files: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn translated(&self) -> usize {
        self.count(|status| matches!(status, FileStatus::Translated { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|status| matches!(status, FileStatus::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|status| matches!(status, FileStatus::Failed { .. }))
    }

    /// Some files failed while the batch as a whole ran to completion
    pub fn is_partial(&self) -> bool {
        self.failed() > 0
    }

    pub fn summary(&self) -> String {
        format!(
            "Processed {} {} files for {}: {} translated, {} skipped, {} failed.",
            self.files.len(),
            self.source_platform,
            self.user,
            self.translated(),
            self.skipped(),
            self.failed()
        )
    }

    fn count(&self, predicate: impl Fn(&FileStatus) -> bool) -> usize {
        self.files.iter().filter(|file| predicate(&file.status)).count()
    }
}

/// Result of asking for a batch translation
#[derive(Debug, Clone)]
pub enum TranslationOutcome {
    /// No eligible source files under the prefix
    NotFound { prefix: String },
    Completed(BatchReport),
}
