//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod booking_adapter;
mod device_adapter;
mod maps_adapter;

pub use booking_adapter::{RecordedBooking, RecordingBookingAdapter};
pub use device_adapter::{FixedPermission, SimulatedSensor};
pub use maps_adapter::MapsAdapter;
