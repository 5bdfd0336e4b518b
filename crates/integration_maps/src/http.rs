//! Shared request handling for the web service endpoints

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::MapsConfig;
use crate::error::MapsError;
use crate::models::{EMPTY_STATUSES, StatusEnvelope};

/// HTTP client bound to one provider configuration
#[derive(Debug, Clone)]
pub(crate) struct MapsHttp {
    client: Client,
    config: MapsConfig,
}

impl MapsHttp {
    pub(crate) fn new(config: &MapsConfig) -> Result<Self, MapsError> {
        if config.api_key.trim().is_empty() {
            return Err(MapsError::ConfigurationError(
                "api_key must not be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("ride-wizard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MapsError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub(crate) const fn config(&self) -> &MapsConfig {
        &self.config
    }

    /// GET `{base_url}/{endpoint}/json` and check the status envelope
    ///
    /// `ZERO_RESULTS` and `NOT_FOUND` pass through as successful responses.
    pub(crate) async fn get<T>(&self, endpoint: &str, params: &[(&str, String)]) -> Result<T, MapsError>
    where
        T: DeserializeOwned + StatusEnvelope,
    {
        let url = format!("{}/{endpoint}/json", self.config.base_url.trim_end_matches('/'));
        let mut query: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        query.push(("key", self.config.api_key.as_str()));

        debug!(%endpoint, "Calling maps provider");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MapsError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    MapsError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MapsError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        if status.is_server_error() {
            return Err(MapsError::ServiceUnavailable(format!("HTTP {status}")));
        }

        if !status.is_success() {
            return Err(MapsError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| MapsError::ParseError(e.to_string()))?;

        let mut parsed: T =
            serde_json::from_str(&body).map_err(|e| MapsError::ParseError(e.to_string()))?;

        let status = parsed.status().to_string();
        match status.as_str() {
            "OK" => Ok(parsed),
            s if EMPTY_STATUSES.contains(&s) => {
                debug!(%endpoint, status = s, "Provider found nothing");
                Ok(parsed)
            },
            s => Err(MapsError::from_status(s, parsed.error_message())),
        }
    }
}
