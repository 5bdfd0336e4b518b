//! Directions client

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::config::MapsConfig;
use crate::error::MapsError;
use crate::http::MapsHttp;
use crate::models::{DirectionsRoute, RawDirectionsResponse};

/// Trait for directions clients
#[async_trait]
pub trait DirectionsClient: Send + Sync {
    /// Driving routes between two coordinate pairs, best first (empty when none)
    async fn driving_routes(
        &self,
        from_lat: f64,
        from_lng: f64,
        to_lat: f64,
        to_lng: f64,
    ) -> Result<Vec<DirectionsRoute>, MapsError>;
}

/// Google Directions client
#[derive(Debug)]
pub struct GoogleDirectionsClient {
    http: MapsHttp,
}

impl GoogleDirectionsClient {
    /// Create a new directions client
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client cannot
    /// be initialized.
    pub fn new(config: &MapsConfig) -> Result<Self, MapsError> {
        Ok(Self {
            http: MapsHttp::new(config)?,
        })
    }
}

#[async_trait]
impl DirectionsClient for GoogleDirectionsClient {
    #[instrument(skip(self), fields(from = %format!("{from_lat},{from_lng}"), to = %format!("{to_lat},{to_lng}")))]
    async fn driving_routes(
        &self,
        from_lat: f64,
        from_lng: f64,
        to_lat: f64,
        to_lng: f64,
    ) -> Result<Vec<DirectionsRoute>, MapsError> {
        let params = [
            ("origin", format!("{from_lat},{from_lng}")),
            ("destination", format!("{to_lat},{to_lng}")),
            ("mode", "driving".to_string()),
            ("language", self.http.config().language.clone()),
        ];

        let response: RawDirectionsResponse = self.http.get("directions", &params).await?;

        let routes: Vec<DirectionsRoute> =
            response.routes.into_iter().map(DirectionsRoute::from).collect();
        if routes.is_empty() {
            warn!("No routes found");
        }

        debug!(count = routes.len(), "Routes found");
        Ok(routes)
    }
}
