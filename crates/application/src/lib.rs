//! Application layer - Use cases and orchestration
//!
//! Owns the location, search, routing and reservation services and the
//! port definitions they depend on. Adapters in the infrastructure layer
//! implement the ports.

pub mod context;
pub mod error;
pub mod ports;
pub mod services;

pub use context::{AppContext, AppPorts, ContextConfig};
pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
