//! Maps error types

use thiserror::Error;

/// Errors that can occur talking to the maps provider
#[derive(Debug, Error)]
pub enum MapsError {
    /// Connection to the provider failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse the provider response
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rate limit or quota exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by API)
        retry_after_secs: Option<u64>,
    },

    /// The provider refused the request (bad or unauthorized key)
    #[error("Request denied: {0}")]
    RequestDenied(String),

    /// The provider rejected the request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The provider failed on its side
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl MapsError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RequestFailed(_)
                | Self::ServiceUnavailable(_)
                | Self::Timeout { .. }
                | Self::RateLimitExceeded { .. }
        )
    }

    /// Map a non-OK provider status to an error
    pub(crate) fn from_status(status: &str, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| status.to_string());
        match status {
            "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => Self::RateLimitExceeded {
                retry_after_secs: None,
            },
            "REQUEST_DENIED" => Self::RequestDenied(message),
            "INVALID_REQUEST" | "MAX_WAYPOINTS_EXCEEDED" | "MAX_ROUTE_LENGTH_EXCEEDED" => {
                Self::InvalidRequest(message)
            },
            _ => Self::ServiceUnavailable(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(MapsError::ConnectionFailed("test".to_string()).is_retryable());
        assert!(MapsError::ServiceUnavailable("UNKNOWN_ERROR".to_string()).is_retryable());
        assert!(MapsError::Timeout { timeout_secs: 10 }.is_retryable());
        assert!(
            MapsError::RateLimitExceeded {
                retry_after_secs: Some(30)
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_non_retryable_errors() {
        assert!(!MapsError::RequestDenied("bad key".to_string()).is_retryable());
        assert!(!MapsError::InvalidRequest("missing input".to_string()).is_retryable());
        assert!(!MapsError::ParseError("eof".to_string()).is_retryable());
        assert!(!MapsError::ConfigurationError("no key".to_string()).is_retryable());
    }

    #[test]
    fn test_from_status() {
        assert!(matches!(
            MapsError::from_status("OVER_QUERY_LIMIT", None),
            MapsError::RateLimitExceeded { .. }
        ));
        assert!(matches!(
            MapsError::from_status("REQUEST_DENIED", Some("The provided API key is invalid.".to_string())),
            MapsError::RequestDenied(msg) if msg.contains("API key")
        ));
        assert!(matches!(
            MapsError::from_status("UNKNOWN_ERROR", None),
            MapsError::ServiceUnavailable(_)
        ));
    }
}
