//! Booking collaborator port

use async_trait::async_trait;
use domain::BookingPayload;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port receiving finalized reservations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BookingPort: Send + Sync {
    /// Hand off a finalized reservation, returning the booking reference
    async fn submit(&self, payload: &BookingPayload) -> Result<String, ApplicationError>;
}
