//! Domain layer for the ride reservation wizard
//!
//! Contains the value objects exchanged between location, search and routing
//! components, the pure wizard state machine, and the polyline codec.
//! This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod polyline;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
