//! Maps provider integration for the ride wizard
//!
//! Talks to the [Google Maps Platform](https://developers.google.com/maps) web
//! services: reverse geocoding, place autocomplete and details, and driving
//! directions.
//!
//! # Architecture
//!
//! Each service has a client trait and a Google implementation:
//! [`GeocodingClient`] / [`GoogleGeocodingClient`] and [`DirectionsClient`] /
//! [`GoogleDirectionsClient`]. Both share the request and status handling in
//! the private `http` module. Provider status codes are mapped so that
//! "nothing found" is data (an empty list or `None`), not an error.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_maps::{GeocodingClient, GoogleGeocodingClient, MapsConfig};
//!
//! let config = MapsConfig { api_key: "...".into(), ..MapsConfig::default() };
//! let client = GoogleGeocodingClient::new(&config)?;
//!
//! let results = client.reverse_geocode(31.5204, 74.3587).await?;
//! ```

mod config;
mod directions;
mod error;
mod geocoding;
mod http;
mod models;

pub use config::MapsConfig;
pub use directions::{DirectionsClient, GoogleDirectionsClient};
pub use error::MapsError;
pub use geocoding::{GeocodingClient, GoogleGeocodingClient};
pub use models::{AddressPart, DirectionsRoute, GeocodedAddress, PlaceQuery, PlaceResult, Prediction};
