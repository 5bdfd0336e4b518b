//! Location permission gate

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, instrument};

use crate::error::ApplicationError;
use crate::ports::PermissionPort;

/// Obtains device location permission
///
/// A grant is remembered for the lifetime of the gate; a refusal is not,
/// so the rider is asked again next time.
pub struct PermissionGate {
    port: Arc<dyn PermissionPort>,
    granted: AtomicBool,
}

impl std::fmt::Debug for PermissionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionGate")
            .field("granted", &self.granted.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl PermissionGate {
    /// Create a gate over the OS permission port
    #[must_use]
    pub fn new(port: Arc<dyn PermissionPort>) -> Self {
        Self {
            port,
            granted: AtomicBool::new(false),
        }
    }

    /// Ask for permission, returning whether it is granted
    #[instrument(skip(self))]
    pub async fn request_permission(&self) -> bool {
        if self.granted.load(Ordering::Acquire) {
            return true;
        }

        let granted = self.port.request_permission().await;
        if granted {
            self.granted.store(true, Ordering::Release);
            info!("Location permission granted");
        } else {
            debug!("Location permission refused");
        }
        granted
    }

    /// Like [`Self::request_permission`], mapping refusal to `PermissionDenied`
    pub async fn require(&self) -> Result<(), ApplicationError> {
        if self.request_permission().await {
            Ok(())
        } else {
            Err(ApplicationError::PermissionDenied)
        }
    }
}
