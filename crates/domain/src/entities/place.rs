//! Search results and resolved places

use serde::{Deserialize, Serialize};

use crate::value_objects::Coordinate;

/// One row of a place search result
///
/// Only meaningful together with the query that produced it; a newer query
/// supersedes the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceSuggestion {
    /// Provider place identifier, used for `fetch_details`
    pub id: String,
    /// Primary line (place name)
    pub main_text: String,
    /// Secondary line (area, city)
    pub secondary_text: String,
}

impl PlaceSuggestion {
    /// Create a suggestion
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        main_text: impl Into<String>,
        secondary_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            main_text: main_text.into(),
            secondary_text: secondary_text.into(),
        }
    }
}

/// A place resolved from a suggestion id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    /// Place name
    pub name: String,
    /// Full formatted address
    pub formatted_address: String,
    /// Position of the place
    pub coordinate: Coordinate,
}
