//! Application configuration
//!
//! Values come from built-in defaults, then an optional TOML file, then `.env`
//! and `CLOUDPORT_*` environment variables.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub mod loader;

#[cfg(test)]
mod tests;

pub use loader::{ConfigLoader, DEFAULT_CONFIG_FILE};

use crate::apply::ApplyConfig;
use crate::model::{BackoffStrategy, ModelBackend, ModelConfig};
use crate::storage::{BackendType, StorageConfig};
use crate::translate::TranslationConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {name}: {reason}")]
    InvalidEnv { name: String, reason: String },

    #[error("Invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,

    /// Route accepting batch translation requests
    #[serde(default = "default_translate_path")]
    pub translate_path: String,

    /// Route accepting apply requests
    #[serde(default = "default_apply_path")]
    pub apply_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            translate_path: default_translate_path(),
            apply_path: default_apply_path(),
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}

fn default_translate_path() -> String {
    "/api/bedrock/username".to_string()
}

fn default_apply_path() -> String {
    "/api/terraform/confirm".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
    #[serde(default)]
    pub apply: ApplyConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            model: ModelConfig::default(),
            translation: TranslationConfig::default(),
            apply: ApplyConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply `CLOUDPORT_*` overrides from the process environment
    pub fn merge_env_vars(&mut self) -> Result<(), ConfigError> {
        self.merge_env_with(|name| std::env::var(name).ok())
    }

    /// Apply `CLOUDPORT_*` overrides from `lookup`
    pub fn merge_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("CLOUDPORT_LOG_LEVEL") {
            self.log_level = level;
        }

        if let Some(bind) = lookup("CLOUDPORT_BIND") {
            self.server.bind = parse_env("CLOUDPORT_BIND", &bind)?;
        }

        if let Some(bucket) = lookup("CLOUDPORT_BUCKET") {
            self.storage.bucket = bucket;
        }

        if let Some(backend) = lookup("CLOUDPORT_STORAGE_BACKEND") {
            self.storage.backend = parse_env::<BackendType>("CLOUDPORT_STORAGE_BACKEND", &backend)?;
        }

        if let Some(root) = lookup("CLOUDPORT_STORAGE_ROOT") {
            self.storage.root = Some(PathBuf::from(root));
        }

        if let Some(endpoint) = lookup("CLOUDPORT_S3_ENDPOINT") {
            self.storage.endpoint = Some(endpoint);
        }

        if let Some(backend) = lookup("CLOUDPORT_MODEL_BACKEND") {
            self.model.backend = parse_env::<ModelBackend>("CLOUDPORT_MODEL_BACKEND", &backend)?;
        }

        if let Some(model_id) = lookup("CLOUDPORT_MODEL_ID") {
            self.model.model_id = model_id;
        }

        if let Some(region) = lookup("CLOUDPORT_MODEL_REGION") {
            self.model.region = region;
        }

        if let Some(id) = lookup("CLOUDPORT_KNOWLEDGE_BASE_ID") {
            self.model.knowledge_base_id = Some(id);
        }

        if let Some(arn) = lookup("CLOUDPORT_MODEL_ARN") {
            self.model.model_arn = Some(arn);
        }

        if let Some(interval) = lookup("CLOUDPORT_MIN_INTERVAL") {
            self.translation.min_interval = parse_duration("CLOUDPORT_MIN_INTERVAL", &interval)?;
        }

        if let Some(root) = lookup("CLOUDPORT_WORKSPACE_ROOT") {
            self.apply.workspace_root = PathBuf::from(root);
        }

        if let Some(bin) = lookup("CLOUDPORT_TERRAFORM_BIN") {
            self.apply.terraform_bin = bin;
        }

        Ok(())
    }

    /// Check cross-field constraints, reporting every problem at once
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            errors.push(format!(
                "log_level '{}' is not one of {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            ));
        }

        for (name, path) in [
            ("server.translate_path", &self.server.translate_path),
            ("server.apply_path", &self.server.apply_path),
        ] {
            if !path.starts_with('/') {
                errors.push(format!("{name} must start with '/'"));
            }
        }
        if self.server.translate_path == self.server.apply_path {
            errors.push("server.translate_path and server.apply_path must differ".to_string());
        }

        if self.storage.backend == BackendType::File && self.storage.root.is_none() {
            errors.push("storage.root is required for the file backend".to_string());
        }
        if self.storage.bucket.trim().is_empty() {
            errors.push("storage.bucket must not be empty".to_string());
        }

        if self.model.backend == ModelBackend::KnowledgeBase {
            if self.model.knowledge_base_id.is_none() {
                errors.push("model.knowledge_base_id is required for the knowledge_base backend".to_string());
            }
            if self.model.model_arn.is_none() {
                errors.push("model.model_arn is required for the knowledge_base backend".to_string());
            }
        }
        if !(0.0..=1.0).contains(&self.model.temperature) {
            errors.push(format!("model.temperature {} is outside 0..=1", self.model.temperature));
        }
        if !(0.0..=1.0).contains(&self.model.top_p) {
            errors.push(format!("model.top_p {} is outside 0..=1", self.model.top_p));
        }
        if self.model.max_tokens == 0 {
            errors.push("model.max_tokens must be positive".to_string());
        }
        let retry = &self.model.retry;
        if retry.attempts == 0 {
            errors.push("model.retry.attempts must be at least 1".to_string());
        }
        if let BackoffStrategy::Exponential { base } = retry.backoff {
            if !base.is_finite() || base <= 0.0 {
                errors.push(format!("model.retry.backoff base {base} must be a positive number"));
            }
        }
        if !(0.0..=1.0).contains(&retry.jitter_factor) {
            errors.push(format!(
                "model.retry.jitter_factor {} is outside 0..=1",
                retry.jitter_factor
            ));
        }
        if retry.initial_delay > retry.max_delay {
            errors.push("model.retry.initial_delay must not exceed model.retry.max_delay".to_string());
        }

        if self.apply.credential_env.trim().is_empty() {
            errors.push("apply.credential_env must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}

fn parse_env<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidEnv {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

fn parse_duration(name: &str, value: &str) -> Result<Duration, ConfigError> {
    humantime_serde::re::humantime::parse_duration(value).map_err(|e| ConfigError::InvalidEnv {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
