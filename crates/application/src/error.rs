//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The rider refused location access; manual pin placement is still possible
    #[error("Location permission denied")]
    PermissionDenied,

    /// No position could be obtained from the sensor
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    /// The place search provider failed
    #[error("Place search failed: {0}")]
    SearchProvider(String),

    /// The provider returned nothing for the requested id
    #[error("Not found: {0}")]
    NotFound(String),

    /// The directions provider returned no route
    #[error("No route available from {from} to {to}")]
    RouteUnavailable {
        /// Origin description
        from: String,
        /// Destination description
        to: String,
    },

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ExternalService(_) | Self::SearchProvider(_)
        )
    }

    /// Create a route unavailable error for an endpoint pair
    pub fn route_unavailable(from: impl ToString, to: impl ToString) -> Self {
        Self::RouteUnavailable {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}
