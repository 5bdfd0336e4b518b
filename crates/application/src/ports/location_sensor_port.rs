//! Device position sensor port

use std::time::Duration;

use async_trait::async_trait;
use domain::LocationFix;
use futures::stream::BoxStream;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Stream of fixes produced by a position watch
///
/// Dropping the stream stops the underlying sensor subscription.
pub type FixStream = BoxStream<'static, LocationFix>;

/// Options passed to the sensor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionOptions {
    /// Request GPS-grade accuracy
    pub high_accuracy: bool,
    /// Upper bound the sensor may spend on a single fix
    pub timeout: Duration,
    /// Oldest cached fix the sensor may return instead of a new reading
    pub max_age: Duration,
    /// Minimum movement in meters before a watch reports a new fix
    pub distance_filter_m: f64,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            max_age: Duration::from_secs(60),
            distance_filter_m: 10.0,
        }
    }
}

/// Port for the device position sensor
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LocationSensorPort: Send + Sync {
    /// Read the current position once
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<LocationFix, ApplicationError>;

    /// Subscribe to position updates at the sensor's native rate
    async fn watch_position(&self, options: &PositionOptions)
    -> Result<FixStream, ApplicationError>;
}
