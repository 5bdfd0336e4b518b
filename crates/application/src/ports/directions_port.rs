//! Directions provider port

use async_trait::async_trait;
use domain::Coordinate;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// One route candidate as returned by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteCandidate {
    /// Overview geometry in encoded polyline form
    pub encoded_polyline: String,
    /// Sum of leg distances in meters
    pub distance_m: u64,
    /// Sum of leg durations in seconds
    pub duration_s: u64,
    /// Provider-formatted distance
    pub distance_text: Option<String>,
    /// Provider-formatted duration
    pub duration_text: Option<String>,
}

/// Port for route computation
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DirectionsPort: Send + Sync {
    /// Route candidates from origin to destination, best first (may be empty)
    async fn routes(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> Result<Vec<RouteCandidate>, ApplicationError>;
}
