//! Saved places (home, work, ...)

use serde::{Deserialize, Serialize};

use crate::value_objects::{Address, Coordinate, ImageRef};

/// A place the rider saved for quick selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPlace {
    /// Stable identifier
    pub id: String,
    /// Rider-chosen label ("Home", "Office")
    pub label: String,
    /// Stored address
    pub address: Address,
    /// Stored position
    pub coordinate: Coordinate,
    /// Icon shown next to the label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<ImageRef>,
}
