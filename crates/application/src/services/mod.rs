//! Application services - Use case implementations

mod location_provider;
mod permission_gate;
mod place_search;
mod reservation_service;
mod reverse_geocoder;
mod route_resolver;

pub use location_provider::{LocationProvider, LocationSettings, WatchHandle};
pub use permission_gate::PermissionGate;
pub use place_search::{PlaceSearchController, SearchSettings, SearchSnapshot};
pub use reservation_service::{ReservationService, RouteUpdate};
pub use reverse_geocoder::{ReverseGeocoder, extract_components};
pub use route_resolver::RouteResolver;
