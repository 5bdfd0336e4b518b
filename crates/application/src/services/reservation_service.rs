//! Reservation wizard controller
//!
//! Owns one [`ReservationWizard`] for a single reservation attempt and funnels
//! every update from location, search and routing through it. The wizard is
//! only locked for synchronous updates, never across a network call.

use std::sync::Arc;

use domain::{
    Coordinate, LocationFix, LocationSelection, LocationSource, PassengerMode, PickupTimeMode,
    ReservationWizard, Route, SavedPlace, WizardState, WizardStep,
};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::{LocationProvider, PlaceSearchController, ReverseGeocoder, RouteResolver, WatchHandle};
use crate::error::ApplicationError;
use crate::ports::BookingPort;

/// Outcome of a route refresh
#[derive(Debug, Clone, PartialEq)]
pub enum RouteUpdate {
    /// Route for the current endpoints
    Computed(Route),
    /// No route for the current endpoints; the previous one stays displayed
    Retained {
        previous: Option<Route>,
        notice: String,
    },
    /// Pickup or destination still missing
    NotReady,
}

struct Tracking {
    handle: WatchHandle,
    consumer: CancellationToken,
}

/// Drives one reservation attempt from initialization to booking hand-off
pub struct ReservationService {
    wizard: Arc<Mutex<ReservationWizard>>,
    location: Arc<LocationProvider>,
    geocoder: Arc<ReverseGeocoder>,
    search: PlaceSearchController,
    routes: Arc<RouteResolver>,
    booking: Arc<dyn BookingPort>,
    tracking: Mutex<Option<Tracking>>,
}

impl std::fmt::Debug for ReservationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationService")
            .field("step", &self.step())
            .field("tracking", &self.is_tracking())
            .finish_non_exhaustive()
    }
}

impl ReservationService {
    #[must_use]
    pub fn new(
        location: Arc<LocationProvider>,
        geocoder: Arc<ReverseGeocoder>,
        search: PlaceSearchController,
        routes: Arc<RouteResolver>,
        booking: Arc<dyn BookingPort>,
    ) -> Self {
        Self {
            wizard: Arc::new(Mutex::new(ReservationWizard::new())),
            location,
            geocoder,
            search,
            routes,
            booking,
            tracking: Mutex::new(None),
        }
    }

    /// Copy of the wizard
    pub fn snapshot(&self) -> ReservationWizard {
        self.wizard.lock().clone()
    }

    /// Current wizard step
    pub fn step(&self) -> WizardStep {
        self.wizard.lock().step()
    }

    /// Copy of the accumulated selections
    pub fn state(&self) -> WizardState {
        self.wizard.lock().state().clone()
    }

    /// Search controller used for destination lookup
    pub const fn search(&self) -> &PlaceSearchController {
        &self.search
    }

    /// Establish the first pickup
    ///
    /// Uses a device fix when one arrives in time, otherwise the configured
    /// default region. Always leaves the wizard awaiting pickup confirmation.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<LocationSelection, ApplicationError> {
        let settings = *self.location.settings();
        let fix = self
            .location
            .get_current_fix(settings.fix_timeout, settings.max_age)
            .await;

        let pickup = match fix {
            Some(fix) => {
                let address = self.geocoder.resolve_address(&fix.coordinate).await;
                LocationSelection::from_fix(&fix, address)
            },
            None => {
                let region = settings.default_region;
                info!(coordinate = %region, "Starting from default region");
                let address = self.geocoder.resolve_address(&region).await;
                LocationSelection::from_address(address, region, LocationSource::DefaultRegion)
            },
        };

        self.wizard.lock().complete_initialization(pickup.clone())?;
        info!(pickup = %pickup.label, source = ?pickup.source, "Wizard initialized");
        Ok(pickup)
    }

    /// Follow the device while the rider confirms a device-sourced pickup
    ///
    /// Each delivered fix is reverse geocoded and moves the pickup. Returns
    /// `false` when tracking does not apply (already tracking, wrong step,
    /// pickup chosen manually).
    #[instrument(skip(self))]
    pub async fn start_tracking(&self) -> Result<bool, ApplicationError> {
        if self.is_tracking() {
            return Ok(false);
        }
        let trackable = {
            let wizard = self.wizard.lock();
            wizard.step() == WizardStep::AwaitingPickupConfirmation
                && wizard.state().pickup.as_ref().is_some_and(|p| {
                    matches!(p.source, LocationSource::Device | LocationSource::DefaultRegion)
                })
        };
        if !trackable {
            debug!("Pickup is not device-sourced, not tracking");
            return Ok(false);
        }

        let (tx, rx) = mpsc::unbounded_channel::<LocationFix>();
        let throttle = self.location.settings().watch_throttle;
        let handle = self
            .location
            .watch_fix(
                move |fix| {
                    // Receiver gone means tracking stopped
                    let _ = tx.send(fix);
                },
                throttle,
            )
            .await?;

        let consumer = CancellationToken::new();
        tokio::spawn(apply_device_fixes(
            rx,
            consumer.clone(),
            Arc::clone(&self.wizard),
            Arc::clone(&self.geocoder),
        ));

        *self.tracking.lock() = Some(Tracking { handle, consumer });
        Ok(true)
    }

    /// Stop following the device
    pub fn stop_tracking(&self) {
        if let Some(tracking) = self.tracking.lock().take() {
            tracking.consumer.cancel();
            self.location.unwatch(tracking.handle);
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking.lock().is_some()
    }

    /// Move the pickup to a dragged map position
    #[instrument(skip(self))]
    pub async fn set_pickup_from_map(
        &self,
        coordinate: Coordinate,
    ) -> Result<LocationSelection, ApplicationError> {
        self.stop_tracking();
        let address = self.geocoder.resolve_address(&coordinate).await;
        let selection = LocationSelection::from_address(address, coordinate, LocationSource::MapDrag);
        self.set_pickup(selection.clone())?;
        Ok(selection)
    }

    /// Pickup from a saved place
    pub fn set_pickup_from_saved(&self, place: &SavedPlace) -> Result<LocationSelection, ApplicationError> {
        let selection = LocationSelection::from_saved(place);
        self.set_pickup(selection.clone())?;
        Ok(selection)
    }

    /// Replace the pickup with a manual selection
    pub fn set_pickup(&self, selection: LocationSelection) -> Result<(), ApplicationError> {
        self.stop_tracking();
        self.wizard.lock().set_pickup(selection)?;
        Ok(())
    }

    /// Rider accepts the pickup point
    pub fn confirm_pickup(&self) -> Result<(), ApplicationError> {
        self.stop_tracking();
        self.wizard.lock().confirm_pickup()?;
        info!("Pickup confirmed");
        Ok(())
    }

    /// Destination from a suggestion in the displayed search results
    #[instrument(skip(self))]
    pub async fn choose_destination(
        &self,
        suggestion_id: &str,
    ) -> Result<LocationSelection, ApplicationError> {
        let details = self.search.select_suggestion(suggestion_id).await?;
        let selection = LocationSelection::from_place(&details);
        self.set_destination(selection.clone())?;
        Ok(selection)
    }

    /// Destination at a dragged map position
    #[instrument(skip(self))]
    pub async fn set_destination_from_map(
        &self,
        coordinate: Coordinate,
    ) -> Result<LocationSelection, ApplicationError> {
        let address = self.geocoder.resolve_address(&coordinate).await;
        let selection = LocationSelection::from_address(address, coordinate, LocationSource::MapDrag);
        self.set_destination(selection.clone())?;
        Ok(selection)
    }

    /// Destination from a saved place
    pub fn set_destination_from_saved(
        &self,
        place: &SavedPlace,
    ) -> Result<LocationSelection, ApplicationError> {
        let selection = LocationSelection::from_saved(place);
        self.set_destination(selection.clone())?;
        Ok(selection)
    }

    /// Set the destination; the displayed route stays until recomputed
    pub fn set_destination(&self, selection: LocationSelection) -> Result<(), ApplicationError> {
        self.wizard.lock().set_destination(selection)?;
        Ok(())
    }

    /// Pick now or a scheduled time
    pub fn set_pickup_time_mode(&self, mode: PickupTimeMode) -> Result<(), ApplicationError> {
        self.wizard.lock().set_pickup_time_mode(mode)?;
        Ok(())
    }

    /// Ride for the rider or for someone else
    pub fn set_passenger_mode(&self, mode: PassengerMode) -> Result<(), ApplicationError> {
        self.wizard.lock().set_passenger_mode(mode)?;
        Ok(())
    }

    /// Move from preferences to the ready step
    pub fn confirm_preferences(&self) -> Result<(), ApplicationError> {
        self.wizard.lock().confirm_preferences()?;
        info!("Reservation ready");
        Ok(())
    }

    /// Bring the displayed route up to date with the endpoints
    ///
    /// The provider is only asked when the endpoint pair changed. Failures
    /// keep whatever route was displayed and come back as a notice.
    #[instrument(skip(self))]
    pub async fn update_route(&self) -> RouteUpdate {
        let (endpoints, displayed) = {
            let wizard = self.wizard.lock();
            if wizard.route_is_current() {
                return wizard
                    .route()
                    .cloned()
                    .map_or(RouteUpdate::NotReady, RouteUpdate::Computed);
            }
            (wizard.endpoints(), wizard.route().cloned())
        };
        let Some((pickup, destination)) = endpoints else {
            return RouteUpdate::NotReady;
        };

        match self.routes.refresh(&pickup, &destination).await {
            Ok(route) => {
                if self.wizard.lock().annotate_route(route.clone()) {
                    RouteUpdate::Computed(route)
                } else {
                    debug!("Endpoints moved while routing, discarding route");
                    RouteUpdate::Retained {
                        previous: self.wizard.lock().route().cloned(),
                        notice: "Endpoints changed while the route was computed".to_string(),
                    }
                }
            },
            Err(e) => {
                warn!(error = %e, "Route update failed, keeping displayed route");
                RouteUpdate::Retained {
                    previous: displayed,
                    notice: e.to_string(),
                }
            },
        }
    }

    /// Hand the finished reservation to the booking collaborator
    ///
    /// Consumes the service; the wizard state is discarded afterwards.
    #[instrument(skip(self))]
    pub async fn submit(self) -> Result<String, ApplicationError> {
        let payload = self.wizard.lock().finalize()?;
        self.stop_tracking();
        let reference = self.booking.submit(&payload).await?;
        info!(reference = %reference, "Reservation handed off");
        Ok(reference)
    }

    /// Stop background work for this reservation
    pub fn shutdown(&self) {
        self.stop_tracking();
    }
}

impl Drop for ReservationService {
    fn drop(&mut self) {
        self.stop_tracking();
    }
}

async fn apply_device_fixes(
    mut fixes: mpsc::UnboundedReceiver<LocationFix>,
    cancelled: CancellationToken,
    wizard: Arc<Mutex<ReservationWizard>>,
    geocoder: Arc<ReverseGeocoder>,
) {
    loop {
        let fix = tokio::select! {
            biased;
            () = cancelled.cancelled() => break,
            fix = fixes.recv() => match fix {
                Some(fix) => fix,
                None => break,
            },
        };

        let address = tokio::select! {
            biased;
            () = cancelled.cancelled() => break,
            address = geocoder.resolve_address(&fix.coordinate) => address,
        };

        let selection = LocationSelection::from_fix(&fix, address);
        if wizard.lock().apply_device_fix(selection) {
            debug!(coordinate = %fix.coordinate, "Pickup follows device");
        } else {
            debug!("Ignoring device fix, pickup no longer tracked");
        }
    }
}
