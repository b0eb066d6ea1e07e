//! Download a user's Terraform files and run `init` then `apply`

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tracing::{error, info, warn};

use super::config::ApplyConfig;
use super::report::{tail, ApplyReport, StepOutcome, STDERR_TAIL_LINES};
use crate::storage::gateway::CREDENTIAL_DIR;
use crate::storage::keys::{self, Platform, CREDENTIAL_FILENAME};
use crate::storage::{ObjectGateway, StorageConfig, StorageError};
use crate::subprocess::{ProcessCommand, TerraformRunner};

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Failed to prepare workspace {path:?}: {source}")]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to download files: {0}")]
    Download(#[from] StorageError),
}

pub struct ApplyOrchestrator {
    gateway: ObjectGateway,
    terraform: TerraformRunner,
    users_prefix: String,
    config: ApplyConfig,
}

impl ApplyOrchestrator {
    pub fn new(
        gateway: ObjectGateway,
        terraform: TerraformRunner,
        storage: &StorageConfig,
        config: ApplyConfig,
    ) -> Self {
        Self {
            gateway,
            terraform,
            users_prefix: storage.users_prefix.clone(),
            config,
        }
    }

    /// Workspace directory for `user`
    pub fn workspace_for(&self, user: &str) -> PathBuf {
        self.config.workspace_root.join(user).join("terraform")
    }

    /// Provision the user's stored configuration for `platform`.
    ///
    /// Terraform failures come back as a report with `succeeded == false`;
    /// errors are reserved for bad input, workspace and listing problems.
    pub async fn run(&self, user: &str, platform: Platform) -> Result<ApplyReport, ApplyError> {
        keys::validate_user(user).map_err(ApplyError::Validation)?;

        let workspace = self.prepare_workspace(user).await?;
        let prefix = keys::user_prefix(&self.users_prefix, user, platform);
        let download = self.gateway.download_all(&prefix, &workspace).await?;

        let credential = workspace.join(CREDENTIAL_DIR).join(CREDENTIAL_FILENAME);
        if !fs::try_exists(&credential).await.unwrap_or(false) {
            warn!(user, "No credential file at {:?}", credential);
        }
        let env = HashMap::from([(
            self.config.credential_env.clone(),
            credential.to_string_lossy().into_owned(),
        )]);

        info!(user, %platform, workspace = ?workspace, "Running terraform");
        let mut steps = Vec::new();
        for command in [
            self.terraform.init_command(&workspace, &env),
            self.terraform.apply_command(&workspace, &env),
        ] {
            let step = self.run_step(command).await;
            let ok = step.succeeded();
            steps.push(step);
            if !ok {
                break;
            }
        }
        let succeeded = steps.len() == 2 && steps.iter().all(StepOutcome::succeeded);

        if self.config.cleanup {
            self.remove_workspace(&workspace).await;
        }

        let report = ApplyReport {
            user: user.to_string(),
            platform,
            workspace,
            downloaded: download.downloaded,
            download_failures: download.failures,
            steps,
            succeeded,
        };
        if report.succeeded {
            info!(user, "{}", report.summary());
        } else {
            error!(user, "{}", report.summary());
        }
        Ok(report)
    }

    async fn prepare_workspace(&self, user: &str) -> Result<PathBuf, ApplyError> {
        let workspace = self.workspace_for(user);
        let key_dir = workspace.join(CREDENTIAL_DIR);
        fs::create_dir_all(&key_dir)
            .await
            .map_err(|source| ApplyError::Workspace {
                path: key_dir.clone(),
                source,
            })?;

        // Terraform runs inside the workspace, so the credential path must not be relative.
        fs::canonicalize(&workspace)
            .await
            .map_err(|source| ApplyError::Workspace {
                path: workspace.clone(),
                source,
            })
    }

    async fn run_step(&self, command: ProcessCommand) -> StepOutcome {
        let shown = command.display();
        match self.terraform.run(command).await {
            Ok(output) => {
                let step = StepOutcome {
                    command: shown,
                    exit_code: output.status.code(),
                    duration_ms: output.duration.as_millis() as u64,
                    stderr_tail: tail(&output.stderr, STDERR_TAIL_LINES),
                    error: None,
                };
                if step.succeeded() {
                    info!("'{}' finished in {} ms", step.command, step.duration_ms);
                } else {
                    error!(
                        "'{}' failed ({:?}): {}",
                        step.command, output.status, step.stderr_tail
                    );
                }
                step
            }
            Err(e) => {
                error!("'{}' could not run: {}", shown, e);
                StepOutcome {
                    command: shown,
                    exit_code: None,
                    duration_ms: 0,
                    stderr_tail: String::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn remove_workspace(&self, workspace: &Path) {
        if let Err(e) = fs::remove_dir_all(workspace).await {
            warn!("Failed to remove workspace {:?}: {}", workspace, e);
        }
    }
}
