//! Property-based tests for domain value objects
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::polyline;
use domain::value_objects::{Address, AddressComponents, Coordinate};
use domain::{PassengerMode, PickupTimeMode, WizardPatch, WizardState};
use proptest::prelude::*;

fn coordinate() -> impl Strategy<Value = Coordinate> {
    (-90.0f64..=90.0f64, -180.0f64..=180.0f64)
        .prop_map(|(lat, lng)| Coordinate::new_unchecked(lat, lng))
}

fn optional_part() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[ a-zA-Z]{0,12}")
}

// ============================================================================
// Coordinate Property Tests
// ============================================================================

mod coordinate_tests {
    use super::*;

    proptest! {
        #[test]
        fn valid_coordinates_accepted(
            lat in -90.0f64..=90.0f64,
            lng in -180.0f64..=180.0f64
        ) {
            prop_assert!(Coordinate::new(lat, lng).is_ok());
        }

        #[test]
        fn invalid_latitude_rejected(
            lat in prop_oneof![(-1000.0f64..-90.1f64), (90.1f64..1000.0f64)],
            lng in -180.0f64..=180.0f64
        ) {
            prop_assert!(Coordinate::new(lat, lng).is_err());
        }

        #[test]
        fn fallback_label_never_empty(c in coordinate()) {
            let label = c.fallback_label();
            prop_assert!(label.starts_with("Location at "));
        }
    }
}

// ============================================================================
// Polyline Property Tests
// ============================================================================

mod polyline_tests {
    use super::*;

    proptest! {
        #[test]
        fn encoded_paths_decode_to_within_precision(path in prop::collection::vec(coordinate(), 0..20)) {
            let encoded = polyline::encode(&path);
            let decoded = polyline::decode(&encoded).unwrap();
            prop_assert_eq!(decoded.len(), path.len());
            for (original, restored) in path.iter().zip(&decoded) {
                prop_assert!((original.latitude() - restored.latitude()).abs() <= 0.5e-5 + 1e-9);
                prop_assert!((original.longitude() - restored.longitude()).abs() <= 0.5e-5 + 1e-9);
            }
        }

        #[test]
        fn encoded_output_stays_in_alphabet(path in prop::collection::vec(coordinate(), 0..20)) {
            let encoded = polyline::encode(&path);
            prop_assert!(encoded.bytes().all(|b| (63..=126).contains(&b)));
        }

        #[test]
        fn decoding_arbitrary_ascii_never_panics(s in "[ -~]{0,40}") {
            let _ = polyline::decode(&s);
        }
    }
}

// ============================================================================
// Address Property Tests
// ============================================================================

mod address_tests {
    use super::*;

    proptest! {
        #[test]
        fn address_label_never_empty(
            neighborhood in optional_part(),
            sublocality in optional_part(),
            city in optional_part(),
            state in optional_part(),
            country in optional_part(),
            formatted in optional_part(),
            c in coordinate()
        ) {
            let components = AddressComponents { neighborhood, sublocality, city, state, country };
            let address = Address::from_components(components, formatted.as_deref(), &c);
            prop_assert!(!address.label().trim().is_empty());
        }
    }
}

// ============================================================================
// WizardState Merge Property Tests
// ============================================================================

mod merge_tests {
    use super::*;

    proptest! {
        #[test]
        fn preference_patches_never_clear_endpoints(
            c in coordinate(),
            set_time in any::<bool>(),
            set_passenger in any::<bool>()
        ) {
            let selection = domain::LocationSelection::from_address(
                Address::fallback(&c),
                c,
                domain::LocationSource::Device,
            );
            let mut state = WizardState {
                pickup: Some(selection.clone()),
                destination: Some(selection.clone()),
                ..WizardState::default()
            };

            let mut patch = WizardPatch::new();
            if set_time {
                patch = patch.pickup_time_mode(PickupTimeMode::Now);
            }
            if set_passenger {
                patch = patch.passenger_mode(PassengerMode::Myself);
            }
            state.merge(patch);

            prop_assert_eq!(state.pickup.as_ref(), Some(&selection));
            prop_assert_eq!(state.destination.as_ref(), Some(&selection));
        }
    }
}
