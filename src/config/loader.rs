use std::path::{Path, PathBuf};
use tokio::fs;

use super::{AppConfig, ConfigError};

/// Looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "cloudport.toml";

/// Builds an [`AppConfig`] from file, `.env` and environment
pub struct ConfigLoader {
    explicit_path: Option<PathBuf>,
    search_dir: PathBuf,
    read_environment: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            explicit_path: None,
            search_dir: PathBuf::from("."),
            read_environment: true,
        }
    }

    /// Use this file instead of `cloudport.toml`; it must exist
    pub fn with_path(mut self, path: Option<PathBuf>) -> Self {
        self.explicit_path = path;
        self
    }

    /// Directory searched for `cloudport.toml` and `.env`
    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.search_dir = dir.to_path_buf();
        self
    }

    /// Skip `.env` and `CLOUDPORT_*` variables
    pub fn without_environment(mut self) -> Self {
        self.read_environment = false;
        self
    }

    /// Load every layer and validate the result
    pub async fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut config = self.load_file().await?;

        if self.read_environment {
            self.load_dotenv();
            config.merge_env_vars()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with the config file, if one is found
    pub async fn load_file(&self) -> Result<AppConfig, ConfigError> {
        let path = match &self.explicit_path {
            Some(path) => path.clone(),
            None => {
                let candidate = self.search_dir.join(DEFAULT_CONFIG_FILE);
                if !fs::try_exists(&candidate).await.unwrap_or(false) {
                    return Ok(AppConfig::default());
                }
                candidate
            }
        };

        let content = fs::read_to_string(&path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
        AppConfig::from_toml(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    fn load_dotenv(&self) {
        let path = self.search_dir.join(".env");
        if !path.exists() {
            return;
        }
        if let Err(e) = dotenvy::from_path(&path) {
            eprintln!("Warning: ignoring {}: {}", path.display(), e);
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
