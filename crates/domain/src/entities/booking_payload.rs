//! Finalized reservation handed to the booking collaborator

use serde::{Deserialize, Serialize};

use super::{LocationSelection, PassengerMode, PickupTimeMode};
use crate::value_objects::{Address, Coordinate};

/// One endpoint of the booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadLocation {
    pub coordinate: Coordinate,
    pub address: Address,
}

impl From<&LocationSelection> for PayloadLocation {
    fn from(selection: &LocationSelection) -> Self {
        Self {
            coordinate: selection.coordinate,
            address: selection.address.clone(),
        }
    }
}

/// Read-only reservation payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingPayload {
    pub pickup: PayloadLocation,
    pub destination: PayloadLocation,
    pub pickup_time_mode: PickupTimeMode,
    pub passenger_mode: PassengerMode,
}
