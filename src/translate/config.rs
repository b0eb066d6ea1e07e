//! Batch translation settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::storage::Platform;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Platform the translated files are written under
    #[serde(default = "default_target_platform")]
    pub target_platform: Platform,

    /// Minimum spacing between consecutive model calls
    #[serde(default = "default_min_interval", with = "humantime_serde")]
    pub min_interval: Duration,

    /// Write empty model answers over the target instead of skipping them
    #[serde(default)]
    pub persist_empty: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            target_platform: default_target_platform(),
            min_interval: default_min_interval(),
            persist_empty: false,
        }
    }
}

fn default_target_platform() -> Platform {
    Platform::Gcp
}

fn default_min_interval() -> Duration {
    Duration::from_secs(5)
}
