//! Exponential backoff for provider calls
//!
//! Only errors reporting themselves as retryable are retried; everything
//! else is returned on the first attempt.
//!
//! # Example
//!
//! ```rust,ignore
//! use infrastructure::retry::{RetryConfig, retry};
//!
//! let routes = retry(&RetryConfig::default(), || client.driving_routes(a, b, c, d)).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, warn};

/// Backoff settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Delay before the first retry in milliseconds (default: 100ms)
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    /// Upper bound for any single delay in milliseconds (default: 2000ms)
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    /// Growth factor between consecutive delays (default: 2.0)
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    /// Retries after the first attempt (default: 2)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Randomize each delay by up to +/-10%
    #[serde(default = "default_jitter")]
    pub jitter: bool,
}

const fn default_initial_delay() -> u64 {
    100
}

const fn default_max_delay() -> u64 {
    2_000
}

const fn default_multiplier() -> f64 {
    2.0
}

const fn default_max_retries() -> u32 {
    2
}

const fn default_jitter() -> bool {
    true
}

/// Fraction of the delay used as the jitter range
const JITTER_FACTOR: f64 = 0.1;

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
            multiplier: default_multiplier(),
            max_retries: default_max_retries(),
            jitter: default_jitter(),
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub const fn new(initial_delay_ms: u64, max_delay_ms: u64, multiplier: f64, max_retries: u32) -> Self {
        Self {
            initial_delay_ms,
            max_delay_ms,
            multiplier,
            max_retries,
            jitter: true,
        }
    }

    /// Single attempt, no retries
    #[must_use]
    pub const fn none() -> Self {
        Self::new(0, 0, 1.0, 0)
    }

    #[must_use]
    pub const fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.multiplier < 1.0 || !self.multiplier.is_finite() {
            return Err(format!(
                "multiplier must be a finite value >= 1.0, got {}",
                self.multiplier
            ));
        }
        if self.initial_delay_ms > self.max_delay_ms {
            return Err("initial_delay_ms must not exceed max_delay_ms".to_string());
        }
        Ok(())
    }

    /// Delay before retry number `retry` (0-indexed)
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    pub fn delay_for_attempt(&self, retry: u32) -> Duration {
        let exponent = retry.min(32) as i32;
        let base = (self.initial_delay_ms as f64) * self.multiplier.powi(exponent);
        let mut delay = base.min(self.max_delay_ms as f64);

        if self.jitter && delay > 0.0 {
            let range = delay * JITTER_FACTOR;
            delay = (delay + rand::rng().random_range(-range..=range)).max(0.0);
        }

        Duration::from_millis(delay as u64)
    }
}

/// Errors that know whether another attempt may succeed
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

impl Retryable for application::ApplicationError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }
}

impl Retryable for integration_maps::MapsError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }
}

/// Final result plus how much retrying it took
#[derive(Debug)]
pub struct RetryResult<T, E> {
    pub result: Result<T, E>,
    /// Attempts made, including the first
    pub attempts: u32,
    pub total_duration: Duration,
}

impl<T, E> RetryResult<T, E> {
    pub fn into_result(self) -> Result<T, E> {
        self.result
    }
}

/// Run `operation` until it succeeds, fails permanently, or retries run out
#[allow(clippy::cast_possible_truncation)]
pub async fn with_retry<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> RetryResult<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    let started = Instant::now();
    let mut attempts = 0u32;

    let result = loop {
        attempts += 1;
        let err = match operation().await {
            Ok(value) => {
                if attempts > 1 {
                    debug!(attempts, "Succeeded after retrying");
                }
                break Ok(value);
            },
            Err(err) => err,
        };

        if !err.is_retryable() {
            debug!(attempts, error = %err, "Permanent failure, not retrying");
            break Err(err);
        }
        let retries_used = attempts - 1;
        if retries_used >= config.max_retries {
            warn!(attempts, error = %err, "Giving up after retries");
            break Err(err);
        }

        let delay = config.delay_for_attempt(retries_used);
        warn!(
            attempt = attempts,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Transient failure, retrying"
        );
        tokio::time::sleep(delay).await;
    };

    RetryResult {
        result,
        attempts,
        total_duration: started.elapsed(),
    }
}

/// [`with_retry`] without the metadata
pub async fn retry<F, Fut, T, E>(config: &RetryConfig, operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    with_retry(config, operation).await.into_result()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use integration_maps::MapsError;

    use super::*;

    fn flaky(failures: u32, calls: &Arc<AtomicU32>) -> impl FnMut() -> std::pin::Pin<Box<dyn Future<Output = Result<u32, MapsError>> + Send>> {
        let calls = Arc::clone(calls);
        move || {
            let calls = Arc::clone(&calls);
            Box::pin(async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n <= failures {
                    Err(MapsError::ServiceUnavailable("UNKNOWN_ERROR".to_string()))
                } else {
                    Ok(n)
                }
            })
        }
    }

    #[test]
    fn delays_grow_and_cap() {
        let config = RetryConfig::new(100, 300, 2.0, 5).without_jitter();
        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(300));
        assert_eq!(config.delay_for_attempt(40), Duration::from_millis(300));
    }

    #[test]
    fn jitter_stays_in_range() {
        let config = RetryConfig::new(1000, 1000, 1.0, 1);
        for _ in 0..20 {
            let ms = config.delay_for_attempt(0).as_millis();
            assert!((900..=1100).contains(&ms), "delay {ms}ms out of range");
        }
    }

    #[test]
    fn validation() {
        assert!(RetryConfig::default().validate().is_ok());
        assert!(RetryConfig::new(100, 50, 2.0, 1).validate().is_err());
        assert!(RetryConfig::new(100, 500, 0.5, 1).validate().is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: RetryConfig = serde_json::from_str(r#"{"max_retries": 4}"#).unwrap();
        assert_eq!(config.max_retries, 4);
        assert_eq!(config.initial_delay_ms, 100);
        assert!(config.jitter);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let config = RetryConfig::new(100, 1000, 2.0, 3).without_jitter();

        let outcome = with_retry(&config, flaky(2, &calls)).await;

        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.result.unwrap(), 3);
        // 100ms + 200ms of backoff
        assert_eq!(outcome.total_duration, Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let config = RetryConfig::new(10, 100, 2.0, 2).without_jitter();

        let result = retry(&config, flaky(10, &calls)).await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_failure_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result: Result<(), MapsError> = retry(&RetryConfig::default(), || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err(MapsError::RequestDenied("bad key".to_string())) }
        })
        .await;

        assert!(matches!(result, Err(MapsError::RequestDenied(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn none_makes_a_single_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let outcome = with_retry(&RetryConfig::none(), flaky(1, &calls)).await;
        assert_eq!(outcome.attempts, 1);
        assert!(outcome.result.is_err());
    }
}
