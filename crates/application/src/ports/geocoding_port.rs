//! Geocoding and place search port
//!
//! Reverse geocoding, forward place search and place details come from the
//! same provider.

use async_trait::async_trait;
use domain::{Coordinate, PlaceDetails, PlaceSuggestion};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// A structured part of a reverse geocoding result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponent {
    /// Full text, e.g. "Punjab"
    pub long_name: String,
    /// Abbreviated text, e.g. "PB"
    pub short_name: String,
    /// Provider component types, e.g. `["administrative_area_level_1", "political"]`
    pub types: Vec<String>,
}

impl AddressComponent {
    /// Whether the component is tagged with `kind`
    #[must_use]
    pub fn has_type(&self, kind: &str) -> bool {
        self.types.iter().any(|t| t == kind)
    }
}

/// One reverse geocoding candidate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodeResult {
    /// Structured components, finest first
    pub address_components: Vec<AddressComponent>,
    /// Provider-formatted address
    pub formatted_address: String,
}

/// Options for a forward place search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Result language, e.g. "en"
    pub language: String,
    /// Country code to bias results towards, e.g. "pk"
    pub region_bias: Option<String>,
    /// Token grouping autocomplete requests with the following details lookup
    pub session_token: Option<String>,
}

/// Port for the geocoding provider
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Coordinate to address candidates, best first (may be empty)
    async fn reverse(&self, coordinate: &Coordinate)
    -> Result<Vec<GeocodeResult>, ApplicationError>;

    /// Text to place predictions
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<PlaceSuggestion>, ApplicationError>;

    /// Resolve a prediction id; `None` when the provider has no geometry for it
    async fn place_details(
        &self,
        place_id: &str,
        options: &SearchOptions,
    ) -> Result<Option<PlaceDetails>, ApplicationError>;
}
