//! Booking adapter that records finalized reservations

use application::error::ApplicationError;
use application::ports::BookingPort;
use async_trait::async_trait;
use domain::BookingPayload;
use parking_lot::Mutex;
use tracing::{info, instrument};
use uuid::Uuid;

/// A payload accepted by [`RecordingBookingAdapter`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedBooking {
    pub reference: String,
    pub payload: BookingPayload,
}

/// Accepts every reservation, logs it and keeps it in memory
///
/// Stands in for the downstream booking system.
#[derive(Debug, Default)]
pub struct RecordingBookingAdapter {
    bookings: Mutex<Vec<RecordedBooking>>,
}

impl RecordingBookingAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything submitted so far, oldest first
    pub fn bookings(&self) -> Vec<RecordedBooking> {
        self.bookings.lock().clone()
    }

    fn next_reference() -> String {
        let id = Uuid::new_v4().simple().to_string();
        format!("RIDE-{}", id[..8].to_uppercase())
    }
}

#[async_trait]
impl BookingPort for RecordingBookingAdapter {
    #[instrument(skip(self, payload))]
    async fn submit(&self, payload: &BookingPayload) -> Result<String, ApplicationError> {
        let body = serde_json::to_string(payload)
            .map_err(|e| ApplicationError::Internal(format!("Failed to encode booking: {e}")))?;
        let reference = Self::next_reference();

        info!(reference = %reference, payload = %body, "Reservation accepted");
        self.bookings.lock().push(RecordedBooking {
            reference: reference.clone(),
            payload: payload.clone(),
        });
        Ok(reference)
    }
}
