//! Batch translation of every file a user holds for one platform

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::config::TranslationConfig;
use super::outcome::{BatchReport, FileOutcome, FileStatus, SkipReason, TranslationOutcome};
use super::pacing::RequestPacer;
use crate::model::TranslationInvoker;
use crate::reference::{select_context, ReferenceExtractor};
use crate::storage::keys::{self, Platform};
use crate::storage::{ObjectGateway, StorageConfig, StorageError, WriteOutcome};

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Failed to list source files: {0}")]
    Listing(#[from] StorageError),
}

/// Drives list, read, reference lookup, model call and write for a batch
pub struct TranslationOrchestrator {
    gateway: ObjectGateway,
    references: ReferenceExtractor,
    invoker: TranslationInvoker,
    users_prefix: String,
    reference_prefix: String,
    config: TranslationConfig,
}

impl TranslationOrchestrator {
    pub fn new(
        gateway: ObjectGateway,
        references: ReferenceExtractor,
        invoker: TranslationInvoker,
        storage: &StorageConfig,
        config: TranslationConfig,
    ) -> Self {
        Self {
            gateway,
            references,
            invoker,
            users_prefix: storage.users_prefix.clone(),
            reference_prefix: storage.reference_prefix.clone(),
            config,
        }
    }

    pub fn target_platform(&self) -> Platform {
        self.config.target_platform
    }

    /// Translate every eligible file under the user's platform folder.
    ///
    /// Per-file problems land in the report; only invalid input and a failed
    /// listing are errors.
    pub async fn run(&self, user: &str, platform: Platform) -> Result<TranslationOutcome, TranslateError> {
        keys::validate_user(user).map_err(TranslateError::Validation)?;
        let target_platform = self.config.target_platform;
        if platform == target_platform {
            return Err(TranslateError::Validation(format!(
                "source platform '{platform}' is already the target platform"
            )));
        }

        let prefix = keys::user_prefix(&self.users_prefix, user, platform);
        let source_keys = self.gateway.list(&prefix).await?;
        if source_keys.is_empty() {
            info!(user, %platform, "No files found under '{}'", prefix);
            return Ok(TranslationOutcome::NotFound { prefix });
        }

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(%run_id, user, %platform, "Translating {} files to {}", source_keys.len(), target_platform);

        let mut pacer = RequestPacer::new(self.config.min_interval);
        let mut files = Vec::with_capacity(source_keys.len());
        for key in &source_keys {
            let outcome = self.translate_file(key, platform, &mut pacer).await;
            log_outcome(&outcome);
            files.push(outcome);
        }

        let report = BatchReport {
            run_id,
            user: user.to_string(),
            source_platform: platform,
            target_platform,
            started_at,
            finished_at: Utc::now(),
            files,
        };
        info!(%run_id, "{}", report.summary());
        Ok(TranslationOutcome::Completed(report))
    }

    async fn translate_file(&self, key: &str, platform: Platform, pacer: &mut RequestPacer) -> FileOutcome {
        let source = match self.gateway.read_text(key).await {
            Ok(source) => source,
            Err(e) => {
                return FileOutcome::skipped(key, SkipReason::SourceUnreadable, Some(e.to_string()));
            }
        };
        if source.is_empty() {
            return FileOutcome::skipped(key, SkipReason::EmptySource, None);
        }

        let reference = if self.invoker.uses_reference_documents() {
            let document = select_context(&self.reference_prefix, key);
            debug!("Using reference document '{}' for '{}'", document, key);
            match self.references.extract(&document).await {
                Ok(text) => Some(text),
                Err(e) => {
                    return FileOutcome::skipped(
                        key,
                        SkipReason::ReferenceUnavailable,
                        Some(e.to_string()),
                    );
                }
            }
        } else {
            None
        };

        pacer.ready().await;
        let code = match self.invoker.translate(key, &source, reference.as_deref()).await {
            Ok(code) => code,
            Err(e) => return FileOutcome::failed(key, None, e.to_string()),
        };

        if code.is_empty() && !self.config.persist_empty {
            return FileOutcome::skipped(key, SkipReason::EmptyTranslation, None);
        }

        let target_key = keys::derive_target_key(key, platform, self.config.target_platform);
        match self.gateway.write_text(&target_key, &code).await {
            Ok(WriteOutcome::Written) => FileOutcome {
                source_key: key.to_string(),
                target_key: Some(target_key),
                status: FileStatus::Translated { bytes: code.len() },
            },
            Ok(WriteOutcome::SkippedReserved) => FileOutcome {
                source_key: key.to_string(),
                target_key: Some(target_key),
                status: FileStatus::Skipped {
                    reason: SkipReason::ReservedTarget,
                    detail: None,
                },
            },
            Err(e) => FileOutcome::failed(key, Some(target_key), e.to_string()),
        }
    }
}

fn log_outcome(outcome: &FileOutcome) {
    let key = outcome.source_key.as_str();
    match &outcome.status {
        FileStatus::Translated { bytes } => {
            info!(key, bytes, target = ?outcome.target_key, "Translated");
        }
        FileStatus::Skipped { reason, detail } => match reason {
            SkipReason::EmptySource => info!(key, "Skipping empty file"),
            _ => warn!(key, ?reason, detail = detail.as_deref().unwrap_or(""), "Skipped"),
        },
        FileStatus::Failed { reason } => error!(key, reason = reason.as_str(), "Translation failed"),
    }
}
