//! Geocoding and places client
//!
//! Reverse geocoding results are cached per coordinate rounded to five
//! decimals (about one meter), since the map pin tends to settle on the same
//! spot repeatedly.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::{debug, instrument};

use crate::config::MapsConfig;
use crate::error::MapsError;
use crate::http::MapsHttp;
use crate::models::{
    GeocodedAddress, PlaceQuery, PlaceResult, Prediction, RawAutocompleteResponse,
    RawDetailsResponse, RawGeocodeResponse,
};

/// Fields requested from the details endpoint
const DETAILS_FIELDS: &str = "geometry,name,formatted_address";

/// Trait for geocoding and place search clients
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Coordinates to address candidates, best first (empty when none)
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<GeocodedAddress>, MapsError>;

    /// Text to place predictions (empty when none)
    async fn autocomplete(
        &self,
        input: &str,
        query: &PlaceQuery,
    ) -> Result<Vec<Prediction>, MapsError>;

    /// Resolve a place id; `None` when unknown or without geometry
    async fn place_details(
        &self,
        place_id: &str,
        query: &PlaceQuery,
    ) -> Result<Option<PlaceResult>, MapsError>;
}

/// Google Geocoding and Places client
#[derive(Debug)]
pub struct GoogleGeocodingClient {
    http: MapsHttp,
    cache: Option<Cache<String, Vec<GeocodedAddress>>>,
}

impl GoogleGeocodingClient {
    /// Create a new geocoding client
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client cannot
    /// be initialized.
    pub fn new(config: &MapsConfig) -> Result<Self, MapsError> {
        let cache = config.caching_enabled().then(|| {
            Cache::builder()
                .max_capacity(1000)
                .time_to_live(Duration::from_secs(u64::from(config.cache_ttl_minutes) * 60))
                .build()
        });

        Ok(Self {
            http: MapsHttp::new(config)?,
            cache,
        })
    }

    fn cache_key(latitude: f64, longitude: f64) -> String {
        format!("{latitude:.5},{longitude:.5}")
    }

    fn language<'a>(&'a self, query: &'a PlaceQuery) -> &'a str {
        query
            .language
            .as_deref()
            .unwrap_or(&self.http.config().language)
    }
}

#[async_trait]
impl GeocodingClient for GoogleGeocodingClient {
    #[instrument(skip(self))]
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<GeocodedAddress>, MapsError> {
        let key = Self::cache_key(latitude, longitude);
        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(&key).await {
                debug!(%key, "Reverse geocoding cache hit");
                return Ok(cached);
            }
        }

        let params = [
            ("latlng", format!("{latitude},{longitude}")),
            ("language", self.http.config().language.clone()),
        ];
        let response: RawGeocodeResponse = self.http.get("geocode", &params).await?;

        let results: Vec<GeocodedAddress> =
            response.results.into_iter().map(GeocodedAddress::from).collect();

        if let Some(cache) = &self.cache {
            if !results.is_empty() {
                cache.insert(key, results.clone()).await;
            }
        }

        debug!(count = results.len(), "Reverse geocoded");
        Ok(results)
    }

    #[instrument(skip(self, query), fields(input_len = input.len()))]
    async fn autocomplete(
        &self,
        input: &str,
        query: &PlaceQuery,
    ) -> Result<Vec<Prediction>, MapsError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let mut params = vec![
            ("input", input.to_string()),
            ("language", self.language(query).to_string()),
        ];
        let region = query
            .region
            .as_deref()
            .or_else(|| self.http.config().region());
        if let Some(region) = region {
            params.push(("components", format!("country:{}", region.to_lowercase())));
        }
        if let Some(token) = &query.session_token {
            params.push(("sessiontoken", token.clone()));
        }

        let response: RawAutocompleteResponse =
            self.http.get("place/autocomplete", &params).await?;

        let predictions: Vec<Prediction> =
            response.predictions.into_iter().map(Prediction::from).collect();
        debug!(count = predictions.len(), "Autocomplete predictions");
        Ok(predictions)
    }

    #[instrument(skip(self, query))]
    async fn place_details(
        &self,
        place_id: &str,
        query: &PlaceQuery,
    ) -> Result<Option<PlaceResult>, MapsError> {
        if place_id.trim().is_empty() {
            return Err(MapsError::InvalidRequest(
                "place_id must not be empty".to_string(),
            ));
        }

        let mut params = vec![
            ("place_id", place_id.to_string()),
            ("fields", DETAILS_FIELDS.to_string()),
            ("language", self.language(query).to_string()),
        ];
        if let Some(token) = &query.session_token {
            params.push(("sessiontoken", token.clone()));
        }

        let response: RawDetailsResponse = self.http.get("place/details", &params).await?;
        Ok(response.result.and_then(|place| place.into_place()))
    }
}
