//! Logging setup
//!
//! Installs a `tracing` subscriber writing to stderr, either human-readable
//! or as JSON lines. `RUST_LOG` overrides the configured filter.

mod subscriber;

pub use subscriber::{LogFormat, TelemetryConfig, TelemetryError, init_telemetry};
