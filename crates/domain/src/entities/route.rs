//! Computed route between two points

use serde::{Deserialize, Serialize};

use crate::value_objects::Coordinate;

/// Decimal places used when comparing route endpoints
pub(crate) const ENDPOINT_PRECISION: i32 = 5;

/// A route between an origin and a destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Total driving distance in kilometers
    pub distance_km: f64,
    /// Total driving time in minutes
    pub duration_min: f64,
    /// Decoded geometry, origin first
    pub path: Vec<Coordinate>,
    /// Provider-formatted distance (e.g. "12.4 km")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_text: Option<String>,
    /// Provider-formatted duration (e.g. "25 mins")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_text: Option<String>,
    /// Origin the route was computed for
    pub origin: Coordinate,
    /// Destination the route was computed for
    pub destination: Coordinate,
}

impl Route {
    /// Whether this route was computed for the given endpoint pair
    #[must_use]
    pub fn connects(&self, origin: &Coordinate, destination: &Coordinate) -> bool {
        self.origin.same_position(origin, ENDPOINT_PRECISION)
            && self.destination.same_position(destination, ENDPOINT_PRECISION)
    }

    /// Short summary such as "12.4 km · 25 min"
    #[must_use]
    pub fn summary(&self) -> String {
        let distance = self
            .distance_text
            .clone()
            .unwrap_or_else(|| format!("{:.1} km", self.distance_km));
        let duration = self
            .duration_text
            .clone()
            .unwrap_or_else(|| format!("{:.0} min", self.duration_min));
        format!("{distance} · {duration}")
    }
}
