//! Human-readable address value object

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// Structured parts of an address, coarsest last
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sublocality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl AddressComponents {
    /// Whether no component carries any text
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts().next().is_none()
    }

    /// Build the display label: neighborhood, sublocality, city, state, country
    ///
    /// Blank parts are skipped and a part equal to the one before it is
    /// dropped (a sublocality often repeats the neighborhood, a city-state
    /// repeats the city). Returns `None` when nothing remains.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        let mut parts: Vec<&str> = Vec::with_capacity(5);
        for part in self.parts() {
            if parts.last().is_some_and(|prev| prev.eq_ignore_ascii_case(part)) {
                continue;
            }
            parts.push(part);
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    fn parts(&self) -> impl Iterator<Item = &str> {
        [
            &self.neighborhood,
            &self.sublocality,
            &self.city,
            &self.state,
            &self.country,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .map(str::trim)
        .filter(|part| !part.is_empty())
    }
}

/// A resolved address. The label is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    formatted_label: String,
    #[serde(default)]
    components: AddressComponents,
    /// Set when the label is a best-effort substitute for a real lookup
    #[serde(default)]
    degraded: bool,
}

impl Address {
    /// Build an address from structured components
    ///
    /// Falls back to `formatted` when the components yield no label, and to
    /// the coordinate label when both are blank.
    #[must_use]
    pub fn from_components(
        components: AddressComponents,
        formatted: Option<&str>,
        coordinate: &Coordinate,
    ) -> Self {
        if let Some(label) = components.label() {
            return Self {
                formatted_label: label,
                components,
                degraded: false,
            };
        }

        match formatted.map(str::trim).filter(|f| !f.is_empty()) {
            Some(formatted) => Self {
                formatted_label: formatted.to_string(),
                components,
                degraded: false,
            },
            None => Self::fallback(coordinate),
        }
    }

    /// Build an address from a free-form label, e.g. a place name
    #[must_use]
    pub fn from_label(label: &str, coordinate: &Coordinate) -> Self {
        Self::from_components(AddressComponents::default(), Some(label), coordinate)
    }

    /// Synthesize an address from the coordinate alone
    #[must_use]
    pub fn fallback(coordinate: &Coordinate) -> Self {
        Self {
            formatted_label: coordinate.fallback_label(),
            components: AddressComponents::default(),
            degraded: true,
        }
    }

    /// Display label
    #[must_use]
    pub fn label(&self) -> &str {
        &self.formatted_label
    }

    /// Structured components (may all be empty)
    #[must_use]
    pub const fn components(&self) -> &AddressComponents {
        &self.components
    }

    /// Whether this address came from the coordinate fallback
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.degraded
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.formatted_label)
    }
}
