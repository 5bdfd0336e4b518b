//! Reservation wizard state machine
//!
//! ```text
//! Initializing -> AwaitingPickupConfirmation -> AwaitingDestination
//!              -> AwaitingTimePreferences -> Ready
//! ```
//!
//! Pickup time and passenger are orthogonal: they can be set from any step
//! and never move the wizard. All writes go through [`WizardPatch`] so no
//! step can clear data owned by another.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    BookingPayload, LocationSelection, PassengerMode, PickupTimeMode, Route, WizardPatch,
    WizardState,
};
use crate::errors::DomainError;
use crate::value_objects::Coordinate;

/// Wizard steps in order
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// Waiting for a device fix or the default region
    #[default]
    Initializing,
    /// Pickup known, rider has not confirmed it yet
    AwaitingPickupConfirmation,
    /// Pickup confirmed, no destination yet
    AwaitingDestination,
    /// Both endpoints known, preferences pending
    AwaitingTimePreferences,
    /// Everything populated and confirmed
    Ready,
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initializing => "initializing",
            Self::AwaitingPickupConfirmation => "awaiting pickup confirmation",
            Self::AwaitingDestination => "awaiting destination",
            Self::AwaitingTimePreferences => "awaiting time preferences",
            Self::Ready => "ready",
        };
        f.write_str(name)
    }
}

/// The reservation wizard: current step, shared state and displayed route
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservationWizard {
    step: WizardStep,
    state: WizardState,
    route: Option<Route>,
}

impl ReservationWizard {
    /// Start a new reservation attempt
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current step
    #[must_use]
    pub const fn step(&self) -> WizardStep {
        self.step
    }

    /// Read-only view of the shared state
    #[must_use]
    pub const fn state(&self) -> &WizardState {
        &self.state
    }

    /// Route currently displayed, if any
    #[must_use]
    pub const fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    /// Pickup and destination coordinates, once both are set
    #[must_use]
    pub fn endpoints(&self) -> Option<(Coordinate, Coordinate)> {
        let pickup = self.state.pickup.as_ref()?;
        let destination = self.state.destination.as_ref()?;
        Some((pickup.coordinate, destination.coordinate))
    }

    /// Finish initialization with the first pickup (device fix or default region)
    ///
    /// # Errors
    ///
    /// Fails unless the wizard is still initializing.
    pub fn complete_initialization(&mut self, pickup: LocationSelection) -> Result<(), DomainError> {
        self.require(WizardStep::Initializing, "complete initialization")?;
        self.state.merge(WizardPatch::new().pickup(pickup));
        self.step = WizardStep::AwaitingPickupConfirmation;
        Ok(())
    }

    /// Apply a patch from a wizard step
    ///
    /// Setting a destination while awaiting it advances the wizard. Pickup
    /// time and passenger never change the step.
    ///
    /// # Errors
    ///
    /// Fails without modifying anything if the patch sets a pickup during
    /// initialization, sets a destination before the pickup is confirmed, or
    /// carries an invalid time or passenger.
    pub fn apply(&mut self, patch: WizardPatch) -> Result<(), DomainError> {
        if patch.pickup.is_some() && self.step == WizardStep::Initializing {
            return Err(DomainError::invalid_transition(self.step, "change pickup"));
        }
        if patch.destination.is_some() && self.step < WizardStep::AwaitingDestination {
            return Err(DomainError::invalid_transition(self.step, "set destination"));
        }
        if let Some(mode) = &patch.pickup_time_mode {
            mode.validate(chrono::Utc::now())?;
        }
        if let Some(mode) = &patch.passenger_mode {
            mode.validate()?;
        }

        let sets_destination = patch.destination.is_some();
        self.state.merge(patch);

        if sets_destination && self.step == WizardStep::AwaitingDestination {
            self.step = WizardStep::AwaitingTimePreferences;
        }
        Ok(())
    }

    /// Move the pickup to a new selection (map drag, search, saved place)
    ///
    /// # Errors
    ///
    /// See [`Self::apply`].
    pub fn set_pickup(&mut self, selection: LocationSelection) -> Result<(), DomainError> {
        self.apply(WizardPatch::new().pickup(selection))
    }

    /// Set the destination
    ///
    /// # Errors
    ///
    /// See [`Self::apply`].
    pub fn set_destination(&mut self, selection: LocationSelection) -> Result<(), DomainError> {
        self.apply(WizardPatch::new().destination(selection))
    }

    /// Set the pickup time preference
    ///
    /// # Errors
    ///
    /// Fails for a scheduled time in the past.
    pub fn set_pickup_time_mode(&mut self, mode: PickupTimeMode) -> Result<(), DomainError> {
        self.apply(WizardPatch::new().pickup_time_mode(mode))
    }

    /// Set the passenger preference
    ///
    /// # Errors
    ///
    /// Fails for another passenger without a name.
    pub fn set_passenger_mode(&mut self, mode: PassengerMode) -> Result<(), DomainError> {
        self.apply(WizardPatch::new().passenger_mode(mode))
    }

    /// Replace a device-sourced pickup with a newer device fix
    ///
    /// Returns `false` and leaves the wizard untouched unless the rider is
    /// still confirming a pickup that came from the device or the default
    /// region. A late fix from a torn-down tracking session lands here.
    pub fn apply_device_fix(&mut self, selection: LocationSelection) -> bool {
        let tracking = self.step == WizardStep::AwaitingPickupConfirmation
            && selection.source.is_device()
            && self.state.pickup.as_ref().is_some_and(|p| {
                matches!(
                    p.source,
                    super::LocationSource::Device | super::LocationSource::DefaultRegion
                )
            });
        if tracking {
            self.state.merge(WizardPatch::new().pickup(selection));
        }
        tracking
    }

    /// Rider confirms the pickup point
    ///
    /// # Errors
    ///
    /// Fails unless the wizard is awaiting pickup confirmation.
    pub fn confirm_pickup(&mut self) -> Result<(), DomainError> {
        self.require(WizardStep::AwaitingPickupConfirmation, "confirm pickup")?;
        self.step = WizardStep::AwaitingDestination;
        Ok(())
    }

    /// Rider confirms the time and passenger preferences
    ///
    /// # Errors
    ///
    /// Fails unless the wizard is awaiting preferences and every field is set.
    pub fn confirm_preferences(&mut self) -> Result<(), DomainError> {
        self.require(WizardStep::AwaitingTimePreferences, "confirm preferences")?;
        let missing = self.state.missing_fields();
        if !missing.is_empty() {
            return Err(DomainError::IncompleteWizard(missing.join(", ")));
        }
        self.step = WizardStep::Ready;
        Ok(())
    }

    /// Attach a computed route
    ///
    /// Returns `false` and keeps the displayed route when `route` was
    /// computed for endpoints that are no longer current.
    pub fn annotate_route(&mut self, route: Route) -> bool {
        let current = self
            .endpoints()
            .is_some_and(|(pickup, destination)| route.connects(&pickup, &destination));
        if current {
            self.route = Some(route);
        }
        current
    }

    /// Whether the displayed route matches the current endpoints
    #[must_use]
    pub fn route_is_current(&self) -> bool {
        match (self.route.as_ref(), self.endpoints()) {
            (Some(route), Some((pickup, destination))) => route.connects(&pickup, &destination),
            _ => false,
        }
    }

    /// Build the payload for the booking collaborator
    ///
    /// # Errors
    ///
    /// Fails unless the wizard is ready.
    pub fn finalize(&self) -> Result<BookingPayload, DomainError> {
        self.require(WizardStep::Ready, "finalize reservation")?;
        let missing = || DomainError::IncompleteWizard(self.state.missing_fields().join(", "));

        let WizardState {
            pickup: Some(pickup),
            destination: Some(destination),
            pickup_time_mode: Some(pickup_time_mode),
            passenger_mode: Some(passenger_mode),
        } = &self.state
        else {
            return Err(missing());
        };

        Ok(BookingPayload {
            pickup: pickup.into(),
            destination: destination.into(),
            pickup_time_mode: *pickup_time_mode,
            passenger_mode: passenger_mode.clone(),
        })
    }

    fn require(&self, step: WizardStep, action: &str) -> Result<(), DomainError> {
        if self.step == step {
            Ok(())
        } else {
            Err(DomainError::invalid_transition(self.step, action))
        }
    }
}
