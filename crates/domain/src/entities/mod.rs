//! Domain entities - Objects with identity and lifecycle

mod booking_payload;
mod location_selection;
mod place;
mod reservation_wizard;
mod route;
mod saved_place;
mod wizard_state;

pub use booking_payload::{BookingPayload, PayloadLocation};
pub use location_selection::{LocationSelection, LocationSource};
pub use place::{PlaceDetails, PlaceSuggestion};
pub use reservation_wizard::{ReservationWizard, WizardStep};
pub use route::Route;
pub use saved_place::SavedPlace;
pub use wizard_state::{PassengerMode, PickupTimeMode, WizardPatch, WizardState};
