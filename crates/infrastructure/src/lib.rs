//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the Google maps
//! adapter, host-side device stand-ins and the booking recorder. Also owns
//! configuration loading, retry policy and logging setup.

pub mod adapters;
pub mod config;
pub mod retry;
pub mod telemetry;

pub use adapters::*;
pub use self::config::{AppConfig, LocationAppConfig, RegionConfig, RetryAppConfig, SearchAppConfig};
pub use retry::{RetryConfig, RetryResult, Retryable, retry, with_retry};
pub use telemetry::{LogFormat, TelemetryConfig, TelemetryError, init_telemetry};
