//! A location chosen for one end of the ride

use serde::{Deserialize, Serialize};

use super::{PlaceDetails, SavedPlace};
use crate::value_objects::{Address, Coordinate, LocationFix};

/// Where a location selection came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocationSource {
    /// Device position sensor
    Device,
    /// Pin dragged on the map
    MapDrag,
    /// Place search result
    SearchResult,
    /// One of the rider's saved places
    SavedPlace,
    /// Fixed default region, used when no device position is available
    DefaultRegion,
}

impl LocationSource {
    /// Whether the selection follows the device sensor
    #[must_use]
    pub const fn is_device(&self) -> bool {
        matches!(self, Self::Device)
    }
}

/// A location selected for pickup or destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSelection {
    /// Short label shown in the wizard
    pub label: String,
    /// Resolved address
    pub address: Address,
    /// Position
    pub coordinate: Coordinate,
    /// Origin of the selection
    pub source: LocationSource,
}

impl LocationSelection {
    /// Selection for a coordinate whose address has been resolved
    #[must_use]
    pub fn from_address(address: Address, coordinate: Coordinate, source: LocationSource) -> Self {
        Self {
            label: address.label().to_string(),
            address,
            coordinate,
            source,
        }
    }

    /// Selection from a device fix
    #[must_use]
    pub fn from_fix(fix: &LocationFix, address: Address) -> Self {
        Self::from_address(address, fix.coordinate, LocationSource::Device)
    }

    /// Selection from a resolved search result
    #[must_use]
    pub fn from_place(details: &PlaceDetails) -> Self {
        let address = Address::from_label(&details.formatted_address, &details.coordinate);
        let label = if details.name.trim().is_empty() {
            address.label().to_string()
        } else {
            details.name.clone()
        };
        Self {
            label,
            address,
            coordinate: details.coordinate,
            source: LocationSource::SearchResult,
        }
    }

    /// Selection from a saved place
    #[must_use]
    pub fn from_saved(place: &SavedPlace) -> Self {
        Self {
            label: place.label.clone(),
            address: place.address.clone(),
            coordinate: place.coordinate,
            source: LocationSource::SavedPlace,
        }
    }
}
