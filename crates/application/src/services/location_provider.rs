//! One-shot and continuous position acquisition
//!
//! Every path soft-fails: a missing permission, a sensor error or a timeout
//! yields `None` from [`LocationProvider::get_current_fix`] so callers fall
//! back to the default region instead of blocking the reservation flow.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use domain::{Coordinate, LocationFix};
use futures::StreamExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, instrument, trace, warn};

use super::PermissionGate;
use crate::error::ApplicationError;
use crate::ports::{LocationSensorPort, PositionOptions};

/// Location acquisition settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationSettings {
    /// Upper bound for a one-shot fix
    pub fix_timeout: Duration,
    /// Oldest cached fix accepted for a one-shot request
    pub max_age: Duration,
    /// Minimum spacing between delivered watch updates
    pub watch_throttle: Duration,
    /// Request GPS-grade accuracy
    pub high_accuracy: bool,
    /// Minimum movement before the sensor reports a watch update
    pub distance_filter_m: f64,
    /// Pickup used when no fix can be obtained
    pub default_region: Coordinate,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            fix_timeout: Duration::from_secs(10),
            max_age: Duration::from_secs(60),
            watch_throttle: Duration::from_secs(5),
            high_accuracy: true,
            distance_filter_m: 10.0,
            default_region: Coordinate::lahore(),
        }
    }
}

/// Handle to an active position watch
///
/// Dropping the handle stops the watch, same as [`LocationProvider::unwatch`].
#[derive(Debug)]
pub struct WatchHandle {
    id: u64,
    _guard: DropGuard,
}

impl WatchHandle {
    /// Identifier for log correlation
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }
}

/// Acquires device positions on top of the permission gate
pub struct LocationProvider {
    gate: Arc<PermissionGate>,
    sensor: Arc<dyn LocationSensorPort>,
    settings: LocationSettings,
    last_fix: Arc<Mutex<Option<LocationFix>>>,
    shutdown: CancellationToken,
    next_watch_id: Mutex<u64>,
}

impl std::fmt::Debug for LocationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationProvider")
            .field("settings", &self.settings)
            .field("last_fix", &*self.last_fix.lock())
            .finish_non_exhaustive()
    }
}

impl LocationProvider {
    /// Create a provider
    #[must_use]
    pub fn new(
        gate: Arc<PermissionGate>,
        sensor: Arc<dyn LocationSensorPort>,
        settings: LocationSettings,
    ) -> Self {
        Self {
            gate,
            sensor,
            settings,
            last_fix: Arc::new(Mutex::new(None)),
            shutdown: CancellationToken::new(),
            next_watch_id: Mutex::new(0),
        }
    }

    /// Settings this provider was built with
    #[must_use]
    pub const fn settings(&self) -> &LocationSettings {
        &self.settings
    }

    /// Most recent fix seen by this provider, if any
    #[must_use]
    pub fn last_fix(&self) -> Option<LocationFix> {
        *self.last_fix.lock()
    }

    /// Current position, or `None` on timeout, sensor error or missing permission
    pub async fn get_current_fix(&self, timeout: Duration, max_age: Duration) -> Option<LocationFix> {
        match self.try_current_fix(timeout, max_age).await {
            Ok(fix) => Some(fix),
            Err(e) => {
                warn!(error = %e, "No location fix, caller falls back to default region");
                None
            },
        }
    }

    /// Current position, reporting why none could be obtained
    ///
    /// A cached fix no older than `max_age` is returned without touching the
    /// sensor. The sensor read is bounded by `timeout`; the permission prompt
    /// is not, since it waits on the rider.
    #[instrument(skip(self))]
    pub async fn try_current_fix(
        &self,
        timeout: Duration,
        max_age: Duration,
    ) -> Result<LocationFix, ApplicationError> {
        self.gate.require().await?;

        if let Some(fix) = self.last_fix() {
            if fix.is_fresh(Utc::now(), max_age) {
                debug!(age_ms = fix.age(Utc::now()).as_millis() as u64, "Using cached fix");
                return Ok(fix);
            }
        }

        let options = PositionOptions {
            timeout,
            max_age,
            ..self.position_options()
        };

        let fix = match tokio::time::timeout(timeout, self.sensor.current_position(&options)).await
        {
            Ok(Ok(fix)) => fix,
            Ok(Err(e)) => return Err(ApplicationError::LocationUnavailable(e.to_string())),
            Err(_) => {
                return Err(ApplicationError::LocationUnavailable(format!(
                    "sensor timed out after {}ms",
                    timeout.as_millis()
                )));
            },
        };

        *self.last_fix.lock() = Some(fix);
        debug!(coordinate = %fix.coordinate, accuracy_m = fix.accuracy_m, "Location fix acquired");
        Ok(fix)
    }

    /// Subscribe to position updates
    ///
    /// `on_update` receives a fix only if at least `throttle` has passed since
    /// the previous delivered fix, whatever the sensor's native rate. The
    /// subscription lives until the handle is passed to [`Self::unwatch`] or
    /// dropped, or the provider is shut down.
    #[instrument(skip(self, on_update))]
    pub async fn watch_fix<F>(
        &self,
        mut on_update: F,
        throttle: Duration,
    ) -> Result<WatchHandle, ApplicationError>
    where
        F: FnMut(LocationFix) + Send + 'static,
    {
        if self.shutdown.is_cancelled() {
            return Err(ApplicationError::Internal(
                "location provider is shut down".to_string(),
            ));
        }
        self.gate.require().await?;

        let mut stream = self.sensor.watch_position(&self.position_options()).await?;
        let id = {
            let mut next = self.next_watch_id.lock();
            *next += 1;
            *next
        };
        let token = self.shutdown.child_token();
        let cancelled = token.clone();
        let last_fix = Arc::clone(&self.last_fix);

        tokio::spawn(async move {
            let mut last_delivered: Option<Instant> = None;
            loop {
                tokio::select! {
                    biased;
                    () = cancelled.cancelled() => break,
                    next = stream.next() => {
                        let Some(fix) = next else { break };
                        *last_fix.lock() = Some(fix);

                        let now = Instant::now();
                        let due = last_delivered.is_none_or(|at| now.duration_since(at) >= throttle);
                        if !due {
                            trace!(watch = id, "Throttled location update");
                            continue;
                        }
                        if cancelled.is_cancelled() {
                            break;
                        }
                        last_delivered = Some(now);
                        on_update(fix);
                    }
                }
            }
            debug!(watch = id, "Location watch ended");
        });

        debug!(watch = id, throttle_ms = throttle.as_millis() as u64, "Location watch started");
        Ok(WatchHandle {
            id,
            _guard: token.drop_guard(),
        })
    }

    /// Stop a position watch
    pub fn unwatch(&self, handle: WatchHandle) {
        debug!(watch = handle.id, "Stopping location watch");
        drop(handle);
    }

    /// Stop every watch and refuse new ones
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    fn position_options(&self) -> PositionOptions {
        PositionOptions {
            high_accuracy: self.settings.high_accuracy,
            timeout: self.settings.fix_timeout,
            max_age: self.settings.max_age,
            distance_filter_m: self.settings.distance_filter_m,
        }
    }
}
