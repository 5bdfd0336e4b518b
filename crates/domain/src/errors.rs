//! Domain-level errors

use thiserror::Error;

use crate::entities::WizardStep;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Latitude or longitude outside the valid range
    #[error("Invalid coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// Encoded polyline could not be decoded
    #[error("Malformed polyline at byte {position}: {reason}")]
    MalformedPolyline { position: usize, reason: String },

    /// The wizard cannot perform the requested action from its current step
    #[error("Cannot {action} while wizard is {step}")]
    InvalidTransition { step: WizardStep, action: String },

    /// The wizard is missing data required for the requested action
    #[error("Reservation incomplete: missing {0}")]
    IncompleteWizard(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create an invalid transition error
    pub fn invalid_transition(step: WizardStep, action: impl Into<String>) -> Self {
        Self::InvalidTransition {
            step,
            action: action.into(),
        }
    }
}
