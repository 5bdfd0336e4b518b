//! Maps provider configuration

use serde::{Deserialize, Serialize};

/// Configuration for the maps provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapsConfig {
    /// Base URL of the web service API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent with every request
    #[serde(default)]
    pub api_key: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Result language (e.g., "en")
    #[serde(default = "default_language")]
    pub language: String,

    /// Country code searches are restricted to (e.g., "pk"), empty for none
    #[serde(default)]
    pub region_bias: String,

    /// Reverse geocoding cache TTL in minutes (0 to disable caching)
    #[serde(default = "default_cache_ttl_minutes")]
    pub cache_ttl_minutes: u32,
}

fn default_base_url() -> String {
    "https://maps.googleapis.com/maps/api".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_language() -> String {
    "en".to_string()
}

const fn default_cache_ttl_minutes() -> u32 {
    60
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
            language: default_language(),
            region_bias: String::new(),
            cache_ttl_minutes: default_cache_ttl_minutes(),
        }
    }
}

impl MapsConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_key: "test-key".to_string(),
            timeout_secs: 5,
            cache_ttl_minutes: 0,
            ..Default::default()
        }
    }

    /// Check if caching is enabled
    #[must_use]
    pub const fn caching_enabled(&self) -> bool {
        self.cache_ttl_minutes > 0
    }

    /// Region bias, if one is configured
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        Some(self.region_bias.trim()).filter(|r| !r.is_empty())
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if url::Url::parse(&self.base_url).is_err() {
            return Err(format!("base_url is not a valid URL: {}", self.base_url));
        }

        if self.api_key.trim().is_empty() {
            return Err("api_key must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if let Some(region) = self.region() {
            if region.len() != 2 || !region.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(format!(
                    "region_bias must be a two-letter country code, got {region:?}"
                ));
            }
        }

        Ok(())
    }
}
