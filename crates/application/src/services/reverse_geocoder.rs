//! Coordinate to human-readable address

use std::sync::Arc;

use domain::{Address, AddressComponents, Coordinate};
use tracing::{debug, instrument, warn};

use crate::ports::{AddressComponent, GeocodeResult, GeocodingPort};

/// Resolves coordinates to addresses, degrading to a coordinate label
pub struct ReverseGeocoder {
    geocoding: Arc<dyn GeocodingPort>,
}

impl std::fmt::Debug for ReverseGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReverseGeocoder").finish_non_exhaustive()
    }
}

impl ReverseGeocoder {
    #[must_use]
    pub fn new(geocoding: Arc<dyn GeocodingPort>) -> Self {
        Self { geocoding }
    }

    /// Resolve `coordinate` to an address
    ///
    /// Never fails. Provider errors and empty responses produce
    /// [`Address::fallback`], marked degraded.
    #[instrument(skip(self), fields(coordinate = %coordinate))]
    pub async fn resolve_address(&self, coordinate: &Coordinate) -> Address {
        let results = match self.geocoding.reverse(coordinate).await {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, "Reverse geocoding failed, using coordinate label");
                return Address::fallback(coordinate);
            },
        };

        let Some(best) = results.first() else {
            debug!("Reverse geocoding returned no results");
            return Address::fallback(coordinate);
        };

        let address = Address::from_components(
            extract_components(best),
            Some(&best.formatted_address),
            coordinate,
        );
        debug!(label = address.label(), "Resolved address");
        address
    }
}

/// Pick the address parts out of a provider result
///
/// Neighborhood prefers `neighborhood`, then `sublocality_level_1`;
/// sublocality is the generic `sublocality`; city is `locality`; state is
/// `administrative_area_level_1`.
pub fn extract_components(result: &GeocodeResult) -> AddressComponents {
    let components = &result.address_components;
    AddressComponents {
        neighborhood: first_of(components, &["neighborhood", "sublocality_level_1"]),
        sublocality: first_of(components, &["sublocality"]),
        city: first_of(components, &["locality"]),
        state: first_of(components, &["administrative_area_level_1"]),
        country: first_of(components, &["country"]),
    }
}

fn first_of(components: &[AddressComponent], kinds: &[&str]) -> Option<String> {
    kinds.iter().find_map(|kind| {
        components
            .iter()
            .find(|c| c.has_type(kind) && !c.long_name.trim().is_empty())
            .map(|c| c.long_name.trim().to_string())
    })
}
