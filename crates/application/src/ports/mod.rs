//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod booking_port;
mod directions_port;
mod geocoding_port;
mod location_sensor_port;
mod permission_port;

#[cfg(test)]
pub use booking_port::MockBookingPort;
pub use booking_port::BookingPort;
#[cfg(test)]
pub use directions_port::MockDirectionsPort;
pub use directions_port::{DirectionsPort, RouteCandidate};
#[cfg(test)]
pub use geocoding_port::MockGeocodingPort;
pub use geocoding_port::{AddressComponent, GeocodeResult, GeocodingPort, SearchOptions};
#[cfg(test)]
pub use location_sensor_port::MockLocationSensorPort;
pub use location_sensor_port::{FixStream, LocationSensorPort, PositionOptions};
#[cfg(test)]
pub use permission_port::MockPermissionPort;
pub use permission_port::PermissionPort;
