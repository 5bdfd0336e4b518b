//! Reservation-in-progress data and its merge operation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::LocationSelection;
use crate::errors::DomainError;

/// When the rider wants to be picked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PickupTimeMode {
    /// As soon as possible
    Now,
    /// At a scheduled time
    Later {
        /// Requested pickup time
        at: DateTime<Utc>,
    },
}

impl PickupTimeMode {
    /// Reject scheduled times that are not in the future
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` for a `Later` time at or before `now`.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), DomainError> {
        match self {
            Self::Later { at } if *at <= now => Err(DomainError::ValidationError(format!(
                "scheduled pickup {at} is in the past"
            ))),
            _ => Ok(()),
        }
    }
}

/// Who is riding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PassengerMode {
    /// The account holder
    Myself,
    /// Someone else, booked on their behalf
    Other {
        /// Passenger name
        name: String,
        /// Passenger phone number, if given
        #[serde(default, skip_serializing_if = "Option::is_none")]
        phone: Option<String>,
    },
}

impl PassengerMode {
    /// Check that a passenger booked for someone else has a name
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` for a blank passenger name.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            Self::Other { name, .. } if name.trim().is_empty() => Err(
                DomainError::ValidationError("passenger name must not be empty".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

/// The shared state every wizard step reads from and writes into
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WizardState {
    /// Pickup location; set once initialization completes and never cleared
    pub pickup: Option<LocationSelection>,
    /// Destination location
    pub destination: Option<LocationSelection>,
    /// Pickup time preference
    pub pickup_time_mode: Option<PickupTimeMode>,
    /// Passenger preference
    pub passenger_mode: Option<PassengerMode>,
}

impl WizardState {
    /// Merge a patch: fields present in the patch replace the current
    /// value, absent fields are left untouched
    pub fn merge(&mut self, patch: WizardPatch) {
        let WizardPatch {
            pickup,
            destination,
            pickup_time_mode,
            passenger_mode,
        } = patch;

        if let Some(pickup) = pickup {
            self.pickup = Some(pickup);
        }
        if let Some(destination) = destination {
            self.destination = Some(destination);
        }
        if let Some(mode) = pickup_time_mode {
            self.pickup_time_mode = Some(mode);
        }
        if let Some(mode) = passenger_mode {
            self.passenger_mode = Some(mode);
        }
    }

    /// Names of the fields still unset
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.pickup.is_none() {
            missing.push("pickup");
        }
        if self.destination.is_none() {
            missing.push("destination");
        }
        if self.pickup_time_mode.is_none() {
            missing.push("pickup time");
        }
        if self.passenger_mode.is_none() {
            missing.push("passenger");
        }
        missing
    }

    /// Whether every field is populated
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// A partial update produced by one wizard step
///
/// A patch can only set fields. There is no way to express clearing one,
/// so a step can never wipe data owned by another step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardPatch {
    pub(crate) pickup: Option<LocationSelection>,
    pub(crate) destination: Option<LocationSelection>,
    pub(crate) pickup_time_mode: Option<PickupTimeMode>,
    pub(crate) passenger_mode: Option<PassengerMode>,
}

impl WizardPatch {
    /// Empty patch
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pickup
    #[must_use]
    pub fn pickup(mut self, selection: LocationSelection) -> Self {
        self.pickup = Some(selection);
        self
    }

    /// Set the destination
    #[must_use]
    pub fn destination(mut self, selection: LocationSelection) -> Self {
        self.destination = Some(selection);
        self
    }

    /// Set the pickup time mode
    #[must_use]
    pub const fn pickup_time_mode(mut self, mode: PickupTimeMode) -> Self {
        self.pickup_time_mode = Some(mode);
        self
    }

    /// Set the passenger mode
    #[must_use]
    pub fn passenger_mode(mut self, mode: PassengerMode) -> Self {
        self.passenger_mode = Some(mode);
        self
    }

    /// Whether the patch sets nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pickup.is_none()
            && self.destination.is_none()
            && self.pickup_time_mode.is_none()
            && self.passenger_mode.is_none()
    }
}
