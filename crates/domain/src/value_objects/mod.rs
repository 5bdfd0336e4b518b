//! Value Objects - Immutable, identity-less domain primitives

mod address;
mod coordinate;
mod image_ref;
mod location_fix;

pub use address::{Address, AddressComponents};
pub use coordinate::Coordinate;
pub use image_ref::ImageRef;
pub use location_fix::LocationFix;
