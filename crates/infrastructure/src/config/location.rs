//! Location and search settings

use std::time::Duration;

use application::{LocationSettings, SearchSettings};
use domain::{Coordinate, DomainError};
use serde::{Deserialize, Serialize};

/// Fallback pickup area used when the device has no fix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for RegionConfig {
    fn default() -> Self {
        let lahore = Coordinate::lahore();
        Self {
            latitude: lahore.latitude(),
            longitude: lahore.longitude(),
        }
    }
}

/// Device location settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationAppConfig {
    /// One-shot fix timeout in milliseconds (default: 10000)
    #[serde(default = "default_fix_timeout_ms")]
    pub fix_timeout_ms: u64,

    /// Oldest cached fix accepted, in milliseconds (default: 60000)
    #[serde(default = "default_max_age_ms")]
    pub max_age_ms: u64,

    /// Minimum spacing between tracking updates in milliseconds (default: 5000)
    #[serde(default = "default_watch_throttle_ms")]
    pub watch_throttle_ms: u64,

    /// Minimum movement before the sensor reports, in meters (default: 10)
    #[serde(default = "default_distance_filter")]
    pub distance_filter_meters: f64,

    /// Request GPS-grade accuracy (default: true)
    #[serde(default = "super::default_true")]
    pub high_accuracy: bool,

    #[serde(default)]
    pub default_region: RegionConfig,
}

const fn default_fix_timeout_ms() -> u64 {
    10_000
}

const fn default_max_age_ms() -> u64 {
    60_000
}

const fn default_watch_throttle_ms() -> u64 {
    5_000
}

const fn default_distance_filter() -> f64 {
    10.0
}

impl Default for LocationAppConfig {
    fn default() -> Self {
        Self {
            fix_timeout_ms: default_fix_timeout_ms(),
            max_age_ms: default_max_age_ms(),
            watch_throttle_ms: default_watch_throttle_ms(),
            distance_filter_meters: default_distance_filter(),
            high_accuracy: true,
            default_region: RegionConfig::default(),
        }
    }
}

impl LocationAppConfig {
    /// Convert to service settings, validating the fallback region
    pub fn to_settings(&self) -> Result<LocationSettings, DomainError> {
        Ok(LocationSettings {
            fix_timeout: Duration::from_millis(self.fix_timeout_ms),
            max_age: Duration::from_millis(self.max_age_ms),
            watch_throttle: Duration::from_millis(self.watch_throttle_ms),
            high_accuracy: self.high_accuracy,
            distance_filter_m: self.distance_filter_meters,
            default_region: Coordinate::new(
                self.default_region.latitude,
                self.default_region.longitude,
            )?,
        })
    }
}

/// Place search settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchAppConfig {
    /// Typing pause before a search fires, in milliseconds (default: 500)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Shortest query that triggers a request (default: 2)
    #[serde(default = "default_min_query_length")]
    pub min_query_length: usize,
}

const fn default_debounce_ms() -> u64 {
    500
}

const fn default_min_query_length() -> usize {
    2
}

impl Default for SearchAppConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_length: default_min_query_length(),
        }
    }
}

impl SearchAppConfig {
    /// Convert to service settings; language and region come from the maps section
    #[must_use]
    pub fn to_settings(&self, language: &str, region_bias: Option<&str>) -> SearchSettings {
        SearchSettings {
            debounce: Duration::from_millis(self.debounce_ms),
            min_query_length: self.min_query_length,
            language: language.to_string(),
            region_bias: region_bias.map(str::to_string),
        }
    }
}
