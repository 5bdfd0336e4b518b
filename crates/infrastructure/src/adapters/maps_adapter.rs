//! Maps adapter - Implements GeocodingPort and DirectionsPort using integration_maps

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::{
    AddressComponent, DirectionsPort, GeocodeResult, GeocodingPort, RouteCandidate, SearchOptions,
};
use async_trait::async_trait;
use domain::{Coordinate, PlaceDetails, PlaceSuggestion};
use integration_maps::{
    DirectionsClient, DirectionsRoute, GeocodedAddress, GeocodingClient, GoogleDirectionsClient,
    GoogleGeocodingClient, MapsConfig, MapsError, PlaceQuery, PlaceResult, Prediction,
};
use tracing::{debug, instrument, warn};

use crate::retry::{RetryConfig, retry};

/// Adapter for the Google geocoding, places and directions services
pub struct MapsAdapter {
    geocoding: Arc<dyn GeocodingClient>,
    directions: Arc<dyn DirectionsClient>,
    retry: RetryConfig,
}

impl std::fmt::Debug for MapsAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapsAdapter")
            .field("geocoding", &"dyn GeocodingClient")
            .field("directions", &"dyn DirectionsClient")
            .field("retry", &self.retry)
            .finish()
    }
}

impl MapsAdapter {
    /// Wrap existing clients
    pub fn new(geocoding: Arc<dyn GeocodingClient>, directions: Arc<dyn DirectionsClient>) -> Self {
        Self {
            geocoding,
            directions,
            retry: RetryConfig::default(),
        }
    }

    /// Build the Google clients from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a client fails to initialize.
    pub fn from_config(config: &MapsConfig) -> Result<Self, ApplicationError> {
        config.validate().map_err(ApplicationError::Configuration)?;
        let geocoding = GoogleGeocodingClient::new(config).map_err(map_error)?;
        let directions = GoogleDirectionsClient::new(config).map_err(map_error)?;
        Ok(Self::new(Arc::new(geocoding), Arc::new(directions)))
    }

    /// Override the retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn place_query(options: &SearchOptions) -> PlaceQuery {
        PlaceQuery {
            language: Some(options.language.clone()).filter(|l| !l.is_empty()),
            region: options.region_bias.clone().filter(|r| !r.is_empty()),
            session_token: options.session_token.clone(),
        }
    }

    fn convert_address(address: GeocodedAddress) -> GeocodeResult {
        GeocodeResult {
            address_components: address
                .parts
                .into_iter()
                .map(|part| AddressComponent {
                    long_name: part.long_name,
                    short_name: part.short_name,
                    types: part.types,
                })
                .collect(),
            formatted_address: address.formatted_address,
        }
    }

    fn convert_prediction(prediction: Prediction) -> PlaceSuggestion {
        PlaceSuggestion::new(
            prediction.place_id,
            prediction.main_text,
            prediction.secondary_text,
        )
    }

    fn convert_place(place: PlaceResult) -> Result<PlaceDetails, ApplicationError> {
        let coordinate = Coordinate::new(place.latitude, place.longitude)?;
        Ok(PlaceDetails {
            name: place.name,
            formatted_address: place.formatted_address,
            coordinate,
        })
    }

    fn convert_route(route: DirectionsRoute) -> RouteCandidate {
        RouteCandidate {
            encoded_polyline: route.polyline,
            distance_m: route.distance_m,
            duration_s: route.duration_s,
            distance_text: route.distance_text,
            duration_text: route.duration_text,
        }
    }
}

/// Map a provider error to the application error space
fn map_error(err: MapsError) -> ApplicationError {
    match err {
        MapsError::RateLimitExceeded { .. } => ApplicationError::RateLimited,
        MapsError::ConfigurationError(msg) => ApplicationError::Configuration(msg),
        other => ApplicationError::ExternalService(other.to_string()),
    }
}

/// Search failures surface as their own kind so the controller can report them
fn map_search_error(err: MapsError) -> ApplicationError {
    match err {
        MapsError::RateLimitExceeded { .. } => ApplicationError::RateLimited,
        other => ApplicationError::SearchProvider(other.to_string()),
    }
}

#[async_trait]
impl GeocodingPort for MapsAdapter {
    #[instrument(skip(self), fields(lat = coordinate.latitude(), lng = coordinate.longitude()))]
    async fn reverse(
        &self,
        coordinate: &Coordinate,
    ) -> Result<Vec<GeocodeResult>, ApplicationError> {
        let (lat, lng) = (coordinate.latitude(), coordinate.longitude());
        let addresses = retry(&self.retry, || self.geocoding.reverse_geocode(lat, lng))
            .await
            .map_err(|e| {
                warn!(error = %e, "Reverse geocoding failed");
                map_error(e)
            })?;

        debug!(count = addresses.len(), "Reverse geocoded");
        Ok(addresses.into_iter().map(Self::convert_address).collect())
    }

    #[instrument(skip(self, options))]
    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<PlaceSuggestion>, ApplicationError> {
        let place_query = Self::place_query(options);
        let predictions = retry(&self.retry, || {
            self.geocoding.autocomplete(query, &place_query)
        })
        .await
        .map_err(map_search_error)?;

        debug!(count = predictions.len(), "Autocomplete returned");
        Ok(predictions
            .into_iter()
            .map(Self::convert_prediction)
            .collect())
    }

    #[instrument(skip(self, options))]
    async fn place_details(
        &self,
        place_id: &str,
        options: &SearchOptions,
    ) -> Result<Option<PlaceDetails>, ApplicationError> {
        let place_query = Self::place_query(options);
        let place = retry(&self.retry, || {
            self.geocoding.place_details(place_id, &place_query)
        })
        .await
        .map_err(map_search_error)?;

        place.map(Self::convert_place).transpose()
    }
}

#[async_trait]
impl DirectionsPort for MapsAdapter {
    #[instrument(skip(self))]
    async fn routes(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> Result<Vec<RouteCandidate>, ApplicationError> {
        let routes = retry(&self.retry, || {
            self.directions.driving_routes(
                origin.latitude(),
                origin.longitude(),
                destination.latitude(),
                destination.longitude(),
            )
        })
        .await
        .map_err(|e| {
            warn!(error = %e, "Directions request failed");
            map_error(e)
        })?;

        debug!(count = routes.len(), "Directions returned");
        Ok(routes.into_iter().map(Self::convert_route).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use integration_maps::AddressPart;

    use super::*;

    #[derive(Default)]
    struct StubGeocoding {
        reverse_calls: AtomicU32,
        fail_first: bool,
    }

    #[async_trait]
    impl GeocodingClient for StubGeocoding {
        async fn reverse_geocode(
            &self,
            _latitude: f64,
            _longitude: f64,
        ) -> Result<Vec<GeocodedAddress>, MapsError> {
            let n = self.reverse_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && n == 0 {
                return Err(MapsError::ServiceUnavailable("UNKNOWN_ERROR".to_string()));
            }
            Ok(vec![GeocodedAddress {
                parts: vec![AddressPart {
                    long_name: "Lahore".to_string(),
                    short_name: "Lahore".to_string(),
                    types: vec!["locality".to_string()],
                }],
                formatted_address: "Lahore, Pakistan".to_string(),
            }])
        }

        async fn autocomplete(
            &self,
            input: &str,
            query: &PlaceQuery,
        ) -> Result<Vec<Prediction>, MapsError> {
            if input == "denied" {
                return Err(MapsError::RequestDenied("key rejected".to_string()));
            }
            Ok(vec![Prediction {
                place_id: format!("id-{input}"),
                main_text: input.to_string(),
                secondary_text: query.region.clone().unwrap_or_default(),
            }])
        }

        async fn place_details(
            &self,
            place_id: &str,
            _query: &PlaceQuery,
        ) -> Result<Option<PlaceResult>, MapsError> {
            Ok(match place_id {
                "good" => Some(PlaceResult {
                    name: "Liberty Market".to_string(),
                    formatted_address: "Gulberg III, Lahore".to_string(),
                    latitude: 31.51,
                    longitude: 74.34,
                }),
                "broken" => Some(PlaceResult {
                    name: "Nowhere".to_string(),
                    formatted_address: String::new(),
                    latitude: 123.0,
                    longitude: 0.0,
                }),
                _ => None,
            })
        }
    }

    struct StubDirections(Result<Vec<DirectionsRoute>, fn() -> MapsError>);

    #[async_trait]
    impl DirectionsClient for StubDirections {
        async fn driving_routes(
            &self,
            _from_lat: f64,
            _from_lng: f64,
            _to_lat: f64,
            _to_lng: f64,
        ) -> Result<Vec<DirectionsRoute>, MapsError> {
            match &self.0 {
                Ok(routes) => Ok(routes.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    fn adapter(geocoding: StubGeocoding, directions: StubDirections) -> MapsAdapter {
        MapsAdapter::new(Arc::new(geocoding), Arc::new(directions))
            .with_retry(RetryConfig::new(1, 5, 2.0, 2).without_jitter())
    }

    fn no_routes() -> StubDirections {
        StubDirections(Ok(Vec::new()))
    }

    #[tokio::test]
    async fn reverse_retries_transient_failure() {
        let maps = adapter(
            StubGeocoding {
                fail_first: true,
                ..Default::default()
            },
            no_routes(),
        );

        let results = maps.reverse(&Coordinate::lahore()).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].formatted_address, "Lahore, Pakistan");
        assert!(results[0].address_components[0].has_type("locality"));
    }

    #[tokio::test]
    async fn search_forwards_region_and_maps_denial() {
        let maps = adapter(StubGeocoding::default(), no_routes());
        let options = SearchOptions {
            language: "en".to_string(),
            region_bias: Some("pk".to_string()),
            session_token: None,
        };

        let suggestions = maps.search("liberty", &options).await.unwrap();
        assert_eq!(suggestions[0].id, "id-liberty");
        assert_eq!(suggestions[0].secondary_text, "pk");

        let err = maps.search("denied", &options).await.unwrap_err();
        assert!(matches!(err, ApplicationError::SearchProvider(_)));
    }

    #[tokio::test]
    async fn details_validate_coordinates() {
        let maps = adapter(StubGeocoding::default(), no_routes());
        let options = SearchOptions::default();

        let place = maps.place_details("good", &options).await.unwrap().unwrap();
        assert_eq!(place.name, "Liberty Market");
        assert!((place.coordinate.latitude() - 31.51).abs() < 1e-9);

        assert!(maps.place_details("missing", &options).await.unwrap().is_none());
        assert!(matches!(
            maps.place_details("broken", &options).await,
            Err(ApplicationError::Domain(_))
        ));
    }

    #[tokio::test]
    async fn routes_are_converted() {
        let route = DirectionsRoute {
            polyline: "_p~iF~ps|U".to_string(),
            distance_m: 4200,
            duration_s: 600,
            distance_text: Some("4.2 km".to_string()),
            duration_text: Some("10 mins".to_string()),
        };
        let maps = adapter(StubGeocoding::default(), StubDirections(Ok(vec![route])));

        let candidates = maps
            .routes(&Coordinate::lahore(), &Coordinate::new_unchecked(31.51, 74.34))
            .await
            .unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].encoded_polyline, "_p~iF~ps|U");
        assert_eq!(candidates[0].distance_m, 4200);
    }

    #[tokio::test]
    async fn rate_limit_maps_to_rate_limited() {
        let maps = adapter(
            StubGeocoding::default(),
            StubDirections(Err(|| MapsError::RateLimitExceeded {
                retry_after_secs: Some(1),
            })),
        )
        .with_retry(RetryConfig::none());

        let err = maps
            .routes(&Coordinate::lahore(), &Coordinate::lahore())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::RateLimited));
    }

    #[test]
    fn from_config_rejects_missing_key() {
        let config = MapsConfig {
            api_key: String::new(),
            ..MapsConfig::for_testing()
        };
        assert!(matches!(
            MapsAdapter::from_config(&config),
            Err(ApplicationError::Configuration(_))
        ));
    }
}
