//! Application configuration
//!
//! Loaded from an optional `config.toml` and `RIDE_WIZARD_*` environment
//! variables, with nested keys separated by a double underscore
//! (e.g. `RIDE_WIZARD_MAPS__API_KEY`).
//!
//! - `location`: fix timeouts, tracking throttle, fallback region
//! - `resilience`: retry policy for provider calls

mod location;
mod resilience;

use std::path::Path;

use application::ContextConfig;
use integration_maps::MapsConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use location::{LocationAppConfig, RegionConfig, SearchAppConfig};
pub use resilience::RetryAppConfig;

use crate::telemetry::TelemetryConfig;

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Environment variable prefix
const ENV_PREFIX: &str = "RIDE_WIZARD";

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Maps provider (geocoding, places, directions)
    #[serde(default)]
    pub maps: MapsConfig,

    #[serde(default)]
    pub location: LocationAppConfig,

    #[serde(default)]
    pub search: SearchAppConfig,

    #[serde(default)]
    pub retry: RetryAppConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment and optional `config.toml` in the working directory
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::build(config::File::with_name("config").required(false))
    }

    /// Load configuration from environment and a specific file
    ///
    /// # Errors
    ///
    /// Fails if the file is missing or malformed.
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        Self::build(config::File::from(path).required(true))
    }

    fn build<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(file)
            // Override with environment variables (e.g., RIDE_WIZARD_SEARCH__DEBOUNCE_MS)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        debug!(
            base_url = %loaded.maps.base_url,
            region = ?loaded.maps.region(),
            "Configuration loaded"
        );
        Ok(loaded)
    }

    /// Check the configuration for values the services cannot run with
    ///
    /// # Errors
    ///
    /// Returns every problem found, one per entry.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(e) = self.maps.validate() {
            errors.push(format!("maps: {e}"));
        }
        if let Err(e) = self.location.to_settings() {
            errors.push(format!("location.default_region: {e}"));
        }
        if self.location.fix_timeout_ms == 0 {
            errors.push("location.fix_timeout_ms must be greater than 0".to_string());
        }
        if self.location.distance_filter_meters < 0.0 {
            errors.push("location.distance_filter_meters must not be negative".to_string());
        }
        if self.search.min_query_length == 0 {
            errors.push("search.min_query_length must be at least 1".to_string());
        }
        if let Err(e) = self.retry.to_retry_config().validate() {
            errors.push(format!("retry: {e}"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Service settings derived from this configuration
    pub fn to_context_config(&self) -> Result<ContextConfig, domain::DomainError> {
        Ok(ContextConfig {
            location: self.location.to_settings()?,
            search: self
                .search
                .to_settings(&self.maps.language, self.maps.region()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_need_an_api_key() {
        let config = AppConfig::default();
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("maps:"));
    }

    #[test]
    fn loads_file_sections() {
        let file = write_config(
            r#"
            [maps]
            api_key = "abc"
            region_bias = "pk"
            language = "ur"

            [location]
            fix_timeout_ms = 3000
            default_region = { latitude = 24.8607, longitude = 67.0011 }

            [search]
            debounce_ms = 250

            [retry]
            max_retries = 0

            [telemetry]
            format = "json"
            "#,
        );

        let config = AppConfig::load_from(file.path()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.maps.api_key, "abc");
        assert_eq!(config.retry.max_retries, 0);
        assert_eq!(config.location.watch_throttle_ms, 5_000);
        assert_eq!(
            config.telemetry.format,
            crate::telemetry::LogFormat::Json
        );

        let context = config.to_context_config().unwrap();
        assert_eq!(context.location.fix_timeout, Duration::from_secs(3));
        assert!((context.location.default_region.latitude() - 24.8607).abs() < 1e-9);
        assert_eq!(context.search.debounce, Duration::from_millis(250));
        assert_eq!(context.search.language, "ur");
        assert_eq!(context.search.region_bias.as_deref(), Some("pk"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(AppConfig::load_from(Path::new("/nonexistent/ride-wizard.toml")).is_err());
    }

    #[test]
    fn invalid_region_is_reported() {
        let config = AppConfig {
            maps: MapsConfig::for_testing(),
            location: LocationAppConfig {
                default_region: RegionConfig {
                    latitude: 95.0,
                    longitude: 0.0,
                },
                ..Default::default()
            },
            search: SearchAppConfig {
                min_query_length: 0,
                ..Default::default()
            },
            ..Default::default()
        };

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(config.to_context_config().is_err());
    }

    #[test]
    fn default_region_is_lahore() {
        let settings = LocationAppConfig::default().to_settings().unwrap();
        assert_eq!(settings.default_region, domain::Coordinate::lahore());
        assert_eq!(settings.watch_throttle, Duration::from_secs(5));
    }
}
