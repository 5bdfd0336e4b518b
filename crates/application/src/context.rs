//! Session-scoped application context
//!
//! Built once per session from the adapters and settings, then hands out a
//! [`ReservationService`] per reservation attempt. Nothing here is global.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ports::{
    BookingPort, DirectionsPort, GeocodingPort, LocationSensorPort, PermissionPort,
};
use crate::services::{
    LocationProvider, LocationSettings, PermissionGate, PlaceSearchController, ReservationService,
    ReverseGeocoder, RouteResolver, SearchSettings,
};

/// Adapters the context is built from
#[derive(Clone)]
pub struct AppPorts {
    pub permission: Arc<dyn PermissionPort>,
    pub sensor: Arc<dyn LocationSensorPort>,
    pub geocoding: Arc<dyn GeocodingPort>,
    pub directions: Arc<dyn DirectionsPort>,
    pub booking: Arc<dyn BookingPort>,
}

impl std::fmt::Debug for AppPorts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppPorts").finish_non_exhaustive()
    }
}

/// Service settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextConfig {
    pub location: LocationSettings,
    pub search: SearchSettings,
}

/// Shared services for one session
pub struct AppContext {
    permission: Arc<PermissionGate>,
    location: Arc<LocationProvider>,
    geocoder: Arc<ReverseGeocoder>,
    search: PlaceSearchController,
    routes: Arc<RouteResolver>,
    booking: Arc<dyn BookingPort>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("location", &self.location)
            .field("search", &self.search)
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Wire the services over the given adapters
    #[must_use]
    pub fn new(ports: AppPorts, config: ContextConfig) -> Self {
        let permission = Arc::new(PermissionGate::new(ports.permission));
        let location = Arc::new(LocationProvider::new(
            Arc::clone(&permission),
            ports.sensor,
            config.location,
        ));
        info!(
            default_region = %config.location.default_region,
            debounce_ms = config.search.debounce.as_millis() as u64,
            "Application context ready"
        );

        Self {
            permission,
            location,
            geocoder: Arc::new(ReverseGeocoder::new(Arc::clone(&ports.geocoding))),
            search: PlaceSearchController::new(ports.geocoding, config.search),
            routes: Arc::new(RouteResolver::new(ports.directions)),
            booking: ports.booking,
        }
    }

    /// Start a new reservation attempt
    ///
    /// Suggestions from a previous attempt are cleared.
    pub fn begin_reservation(&self) -> ReservationService {
        debug!("Beginning reservation");
        self.search.reset();
        ReservationService::new(
            Arc::clone(&self.location),
            Arc::clone(&self.geocoder),
            self.search.clone(),
            Arc::clone(&self.routes),
            Arc::clone(&self.booking),
        )
    }

    /// Shared permission gate
    pub fn permission(&self) -> &PermissionGate {
        &self.permission
    }

    /// Shared location provider
    pub fn location(&self) -> &LocationProvider {
        &self.location
    }

    /// Shared reverse geocoder
    pub fn geocoder(&self) -> &ReverseGeocoder {
        &self.geocoder
    }

    /// Shared place search controller
    pub fn search(&self) -> &PlaceSearchController {
        &self.search
    }

    /// Shared route resolver
    pub fn routes(&self) -> &RouteResolver {
        &self.routes
    }

    /// Stop every location watch started through this context
    pub fn shutdown(&self) {
        info!("Shutting down application context");
        self.location.shutdown();
        self.search.reset();
    }
}
