//! Maps data models
//!
//! Typed results handed to callers, plus the raw web service envelopes they
//! are converted from.

use serde::{Deserialize, Serialize};

/// One structured part of a geocoded address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressPart {
    pub long_name: String,
    pub short_name: String,
    pub types: Vec<String>,
}

/// A reverse geocoding result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodedAddress {
    /// Structured parts, finest first
    pub parts: Vec<AddressPart>,
    /// Provider-formatted address
    pub formatted_address: String,
}

/// An autocomplete prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub place_id: String,
    /// Primary text (place name)
    pub main_text: String,
    /// Secondary text (area, city)
    pub secondary_text: String,
}

/// A resolved place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    pub name: String,
    pub formatted_address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A driving route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionsRoute {
    /// Encoded overview polyline
    pub polyline: String,
    /// Sum of leg distances in meters
    pub distance_m: u64,
    /// Sum of leg durations in seconds
    pub duration_s: u64,
    /// Formatted distance, when the route has a single leg
    pub distance_text: Option<String>,
    /// Formatted duration, when the route has a single leg
    pub duration_text: Option<String>,
}

/// Per-request options for autocomplete and details
///
/// Unset fields fall back to the client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceQuery {
    pub language: Option<String>,
    pub region: Option<String>,
    /// Groups autocomplete requests with the following details request
    pub session_token: Option<String>,
}

// --- Raw API response types for deserialization ---

/// Status values that mean "nothing found" rather than failure
pub(crate) const EMPTY_STATUSES: [&str; 2] = ["ZERO_RESULTS", "NOT_FOUND"];

#[derive(Debug, Deserialize)]
pub(crate) struct RawGeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<RawGeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawGeocodeResult {
    #[serde(default)]
    pub address_components: Vec<RawAddressComponent>,
    #[serde(default)]
    pub formatted_address: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAutocompleteResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub predictions: Vec<RawPrediction>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPrediction {
    pub place_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub structured_formatting: Option<RawStructuredFormatting>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawStructuredFormatting {
    #[serde(default)]
    pub main_text: String,
    #[serde(default)]
    pub secondary_text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDetailsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub result: Option<RawPlace>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPlace {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub formatted_address: String,
    pub geometry: Option<RawGeometry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawGeometry {
    pub location: RawLatLng,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawLatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRoute {
    pub overview_polyline: RawPolyline,
    #[serde(default)]
    pub legs: Vec<RawLeg>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPolyline {
    pub points: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawLeg {
    pub distance: Option<RawTextValue>,
    pub duration: Option<RawTextValue>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTextValue {
    pub text: String,
    pub value: u64,
}

/// Common accessors for the status envelope
pub(crate) trait StatusEnvelope {
    fn status(&self) -> &str;
    fn error_message(&mut self) -> Option<String>;
}

macro_rules! status_envelope {
    ($($raw:ty),+) => {
        $(impl StatusEnvelope for $raw {
            fn status(&self) -> &str {
                &self.status
            }

            fn error_message(&mut self) -> Option<String> {
                self.error_message.take()
            }
        })+
    };
}

status_envelope!(
    RawGeocodeResponse,
    RawAutocompleteResponse,
    RawDetailsResponse,
    RawDirectionsResponse
);

impl From<RawGeocodeResult> for GeocodedAddress {
    fn from(raw: RawGeocodeResult) -> Self {
        Self {
            parts: raw
                .address_components
                .into_iter()
                .map(|c| AddressPart {
                    long_name: c.long_name,
                    short_name: c.short_name,
                    types: c.types,
                })
                .collect(),
            formatted_address: raw.formatted_address,
        }
    }
}

impl From<RawPrediction> for Prediction {
    fn from(raw: RawPrediction) -> Self {
        let (main_text, secondary_text) = match raw.structured_formatting {
            Some(f) if !f.main_text.is_empty() => (f.main_text, f.secondary_text),
            _ => split_description(&raw.description),
        };
        Self {
            place_id: raw.place_id,
            main_text,
            secondary_text,
        }
    }
}

/// "Liberty Market, Gulberg III, Lahore" -> ("Liberty Market", "Gulberg III, Lahore")
fn split_description(description: &str) -> (String, String) {
    match description.split_once(',') {
        Some((main, rest)) => (main.trim().to_string(), rest.trim().to_string()),
        None => (description.trim().to_string(), String::new()),
    }
}

impl RawPlace {
    /// Convert to a typed place; `None` without geometry
    pub(crate) fn into_place(self) -> Option<PlaceResult> {
        let location = self.geometry?.location;
        Some(PlaceResult {
            name: self.name,
            formatted_address: self.formatted_address,
            latitude: location.lat,
            longitude: location.lng,
        })
    }
}

impl From<RawRoute> for DirectionsRoute {
    fn from(raw: RawRoute) -> Self {
        let distance_m = raw
            .legs
            .iter()
            .filter_map(|l| l.distance.as_ref())
            .map(|d| d.value)
            .sum();
        let duration_s = raw
            .legs
            .iter()
            .filter_map(|l| l.duration.as_ref())
            .map(|d| d.value)
            .sum();
        let single_leg = raw.legs.len() == 1;
        let (distance_text, duration_text) = match raw.legs.into_iter().next() {
            Some(leg) if single_leg => (
                leg.distance.map(|d| d.text),
                leg.duration.map(|d| d.text),
            ),
            _ => (None, None),
        };

        Self {
            polyline: raw.overview_polyline.points,
            distance_m,
            duration_s,
            distance_text,
            duration_text,
        }
    }
}
