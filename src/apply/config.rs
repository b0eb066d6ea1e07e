//! Apply workspace and terraform settings

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyConfig {
    /// Parent of the per-user `<user>/terraform` workspaces
    #[serde(default = "default_workspace_root")]
    pub workspace_root: PathBuf,

    #[serde(default = "default_terraform_bin")]
    pub terraform_bin: String,

    /// Variable the child process reads the credential path from
    #[serde(default = "default_credential_env")]
    pub credential_env: String,

    /// Per-command limit for `init` and `apply`
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Additional parent variables forwarded to terraform
    #[serde(default)]
    pub passthrough_env: Vec<String>,

    /// Remove the workspace once the run is over
    #[serde(default)]
    pub cleanup: bool,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            workspace_root: default_workspace_root(),
            terraform_bin: default_terraform_bin(),
            credential_env: default_credential_env(),
            timeout: default_timeout(),
            passthrough_env: Vec::new(),
            cleanup: false,
        }
    }
}

fn default_workspace_root() -> PathBuf {
    PathBuf::from("/tmp")
}

fn default_terraform_bin() -> String {
    "terraform".to_string()
}

fn default_credential_env() -> String {
    "GOOGLE_APPLICATION_CREDENTIALS".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30 * 60)
}
