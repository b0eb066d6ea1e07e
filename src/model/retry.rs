//! Retry with backoff for model calls
//!
//! Only errors the remote service reports as transient (throttling, timeouts,
//! unavailability) are retried; everything else fails on the first attempt.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

use super::client::ModelError;

/// Retry configuration with backoff strategies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts, including the first one
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    /// Backoff strategy
    #[serde(default)]
    pub backoff: BackoffStrategy,

    /// Delay before the first retry
    #[serde(default = "default_initial_delay", with = "humantime_serde")]
    pub initial_delay: Duration,

    /// Maximum delay between retries
    #[serde(default = "default_max_delay", with = "humantime_serde")]
    pub max_delay: Duration,

    /// Add jitter to delays
    #[serde(default = "default_jitter")]
    pub jitter: bool,

    /// Jitter factor (0.0 to 1.0)
    #[serde(default = "default_jitter_factor")]
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            backoff: BackoffStrategy::default(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            jitter: default_jitter(),
            jitter_factor: default_jitter_factor(),
        }
    }
}

/// Backoff strategies for retry delays
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffStrategy {
    /// Fixed delay between retries
    Fixed,
    /// Exponential increase in delay
    Exponential {
        #[serde(default = "default_exponential_base")]
        base: f64,
    },
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        BackoffStrategy::Exponential {
            base: default_exponential_base(),
        }
    }
}

/// Runs a model call until it succeeds, fails permanently, or attempts run out
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Single attempt, no retries
    pub fn disabled() -> Self {
        Self::new(RetryConfig {
            attempts: 1,
            ..RetryConfig::default()
        })
    }

    /// Execute an operation with retry logic
    pub async fn execute_with_retry<F, Fut, T>(
        &self,
        operation: F,
        context: &str,
    ) -> Result<T, ModelError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ModelError>>,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;

            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    if !err.is_retryable() {
                        return Err(err);
                    }
                    if attempt >= self.config.attempts.max(1) {
                        warn!(
                            "Giving up on {} after {} attempts: {}",
                            context, attempt, err
                        );
                        return Err(err);
                    }

                    let delay = self.apply_jitter(self.calculate_delay(attempt));
                    info!(
                        "Retrying {} (attempt {}/{}) after {:?}: {}",
                        context, attempt, self.config.attempts, delay, err
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Calculate delay for the given attempt
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let base_delay = match &self.config.backoff {
            BackoffStrategy::Fixed => self.config.initial_delay,
            BackoffStrategy::Exponential { base } => {
                let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
                let seconds = self.config.initial_delay.as_secs_f64() * base.powi(exponent);
                let capped = seconds.min(self.config.max_delay.as_secs_f64());
                // negative products fall back to the cap
                Duration::try_from_secs_f64(capped).unwrap_or(self.config.max_delay)
            }
        };

        base_delay.min(self.config.max_delay)
    }

    /// Apply jitter to delay
    pub fn apply_jitter(&self, delay: Duration) -> Duration {
        if !self.config.jitter {
            return delay;
        }

        let mut rng = rand::rng();
        let jitter_range = delay.as_secs_f64() * self.config.jitter_factor.clamp(0.0, 1.0);
        if jitter_range <= 0.0 {
            return delay;
        }
        let jitter = rng.random_range(-jitter_range / 2.0..=jitter_range / 2.0);
        Duration::from_secs_f64((delay.as_secs_f64() + jitter).max(0.0))
    }
}

fn default_attempts() -> u32 {
    4
}

fn default_initial_delay() -> Duration {
    Duration::from_secs(2)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(30)
}

fn default_jitter() -> bool {
    true
}

fn default_jitter_factor() -> f64 {
    0.25
}

fn default_exponential_base() -> f64 {
    2.0
}
