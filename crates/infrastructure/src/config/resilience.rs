//! Retry policy for provider calls

use serde::{Deserialize, Serialize};

use crate::retry::RetryConfig;

/// Retry configuration applied to every maps request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryAppConfig {
    /// Initial delay before first retry in milliseconds (default: 100ms)
    #[serde(default = "default_retry_initial_delay")]
    pub initial_delay_ms: u64,

    /// Maximum delay between retries in milliseconds (default: 2000ms)
    #[serde(default = "default_retry_max_delay")]
    pub max_delay_ms: u64,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_retry_multiplier")]
    pub multiplier: f64,

    /// Retries after the first attempt (default: 2, 0 disables retrying)
    #[serde(default = "default_retry_max_retries")]
    pub max_retries: u32,

    /// Randomize delays (default: true)
    #[serde(default = "super::default_true")]
    pub jitter: bool,
}

const fn default_retry_initial_delay() -> u64 {
    100
}

const fn default_retry_max_delay() -> u64 {
    2_000
}

const fn default_retry_multiplier() -> f64 {
    2.0
}

const fn default_retry_max_retries() -> u32 {
    2
}

impl Default for RetryAppConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_retry_initial_delay(),
            max_delay_ms: default_retry_max_delay(),
            multiplier: default_retry_multiplier(),
            max_retries: default_retry_max_retries(),
            jitter: true,
        }
    }
}

impl RetryAppConfig {
    /// Convert to the runtime retry policy
    #[must_use]
    pub fn to_retry_config(&self) -> RetryConfig {
        RetryConfig {
            initial_delay_ms: self.initial_delay_ms,
            max_delay_ms: self.max_delay_ms,
            multiplier: self.multiplier,
            max_retries: self.max_retries,
            jitter: self.jitter,
        }
    }
}
