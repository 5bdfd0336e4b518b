//! Route computation and polyline decoding

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use domain::{Coordinate, Route, polyline};
use parking_lot::Mutex;
use tracing::{debug, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{DirectionsPort, RouteCandidate};

/// Computes routes and remembers the last one computed
///
/// Only the latest request may replace the remembered route; a slower,
/// older request finishing afterwards is returned to its caller but not
/// stored.
pub struct RouteResolver {
    directions: Arc<dyn DirectionsPort>,
    current: Mutex<Option<Route>>,
    generation: AtomicU64,
}

impl std::fmt::Debug for RouteResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteResolver")
            .field("current", &*self.current.lock())
            .finish_non_exhaustive()
    }
}

impl RouteResolver {
    #[must_use]
    pub fn new(directions: Arc<dyn DirectionsPort>) -> Self {
        Self {
            directions,
            current: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Last successfully computed route
    pub fn current(&self) -> Option<Route> {
        self.current.lock().clone()
    }

    /// Request a route and take the provider's first candidate
    ///
    /// With zero candidates this fails with `RouteUnavailable` and the
    /// remembered route is left as it was.
    #[instrument(skip(self), fields(origin = %origin, destination = %destination))]
    pub async fn compute_route(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> Result<Route, ApplicationError> {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        let candidates = self.directions.routes(origin, destination).await?;
        let Some(best) = candidates.into_iter().next() else {
            warn!("Directions provider returned no routes, keeping previous route");
            return Err(ApplicationError::route_unavailable(origin, destination));
        };

        let route = build_route(best, *origin, *destination)?;

        let mut current = self.current.lock();
        if self.generation.load(Ordering::Acquire) == generation {
            *current = Some(route.clone());
        } else {
            debug!(generation, "Newer route request in flight, not storing");
        }
        debug!(
            distance_km = route.distance_km,
            duration_min = route.duration_min,
            points = route.path.len(),
            "Route computed"
        );
        Ok(route)
    }

    /// Remembered route when it was computed for this pair, else a new one
    pub async fn refresh(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> Result<Route, ApplicationError> {
        if let Some(route) = self.current().filter(|r| r.connects(origin, destination)) {
            debug!("Endpoints unchanged, reusing route");
            return Ok(route);
        }
        self.compute_route(origin, destination).await
    }
}

#[allow(clippy::cast_precision_loss)]
fn build_route(
    candidate: RouteCandidate,
    origin: Coordinate,
    destination: Coordinate,
) -> Result<Route, ApplicationError> {
    let mut path = polyline::decode(&candidate.encoded_polyline)?;
    if path.is_empty() {
        path = vec![origin, destination];
    }

    Ok(Route {
        distance_km: candidate.distance_m as f64 / 1000.0,
        duration_min: candidate.duration_s as f64 / 60.0,
        path,
        distance_text: candidate.distance_text,
        duration_text: candidate.duration_text,
        origin,
        destination,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockDirectionsPort;

    fn lahore() -> Coordinate {
        Coordinate::new_unchecked(31.5204, 74.3587)
    }

    fn airport() -> Coordinate {
        Coordinate::new_unchecked(31.5216, 74.4036)
    }

    fn candidate(polyline: &str) -> RouteCandidate {
        RouteCandidate {
            encoded_polyline: polyline.to_string(),
            distance_m: 12_400,
            duration_s: 1_500,
            distance_text: Some("12.4 km".to_string()),
            duration_text: Some("25 mins".to_string()),
        }
    }

    #[tokio::test]
    async fn decodes_first_candidate() {
        let mut port = MockDirectionsPort::new();
        port.expect_routes().times(1).returning(|_, _| {
            Ok(vec![
                candidate("_p~iF~ps|U_ulLnnqC_mqNvxq`@"),
                candidate("??"),
            ])
        });
        let resolver = RouteResolver::new(Arc::new(port));

        let route = resolver.compute_route(&lahore(), &airport()).await.unwrap();
        assert_eq!(route.path.len(), 3);
        assert!((route.path[2].latitude() - 43.252).abs() < 1e-9);
        assert!((route.distance_km - 12.4).abs() < 1e-9);
        assert!((route.duration_min - 25.0).abs() < 1e-9);
        assert_eq!(resolver.current(), Some(route));
    }

    #[tokio::test]
    async fn zero_routes_keeps_previous_route() {
        let mut port = MockDirectionsPort::new();
        let mut calls = 0;
        port.expect_routes().times(2).returning(move |_, _| {
            calls += 1;
            if calls == 1 {
                Ok(vec![candidate("_p~iF~ps|U")])
            } else {
                Ok(vec![])
            }
        });
        let resolver = RouteResolver::new(Arc::new(port));

        let first = resolver.compute_route(&lahore(), &airport()).await.unwrap();
        let err = resolver
            .compute_route(&airport(), &lahore())
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::RouteUnavailable { .. }));
        assert_eq!(resolver.current(), Some(first));
    }

    #[tokio::test]
    async fn malformed_polyline_is_domain_error() {
        let mut port = MockDirectionsPort::new();
        port.expect_routes()
            .returning(|_, _| Ok(vec![candidate("_p~iF~ps|")]));
        let resolver = RouteResolver::new(Arc::new(port));

        let err = resolver.compute_route(&lahore(), &airport()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Domain(_)));
        assert!(resolver.current().is_none());
    }

    #[tokio::test]
    async fn empty_geometry_falls_back_to_straight_line() {
        let mut port = MockDirectionsPort::new();
        port.expect_routes().returning(|_, _| Ok(vec![candidate("")]));
        let resolver = RouteResolver::new(Arc::new(port));

        let route = resolver.compute_route(&lahore(), &airport()).await.unwrap();
        assert_eq!(route.path, vec![lahore(), airport()]);
    }

    #[tokio::test]
    async fn refresh_reuses_route_for_same_pair() {
        let mut port = MockDirectionsPort::new();
        port.expect_routes()
            .times(2)
            .returning(|_, _| Ok(vec![candidate("_p~iF~ps|U")]));
        let resolver = RouteResolver::new(Arc::new(port));

        resolver.refresh(&lahore(), &airport()).await.unwrap();
        resolver.refresh(&lahore(), &airport()).await.unwrap();
        // Moved destination recomputes
        resolver.refresh(&lahore(), &lahore()).await.unwrap();
    }
}
