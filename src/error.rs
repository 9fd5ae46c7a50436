//! Unified error handling for the location-updater library.
//!
//! Lifecycle preconditions surface as real errors rather than debug-only
//! assertions, so a release build can never silently skip the check.

use std::fmt;

use crate::controller::ControllerState;

/// Unified error type for location-updater operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// `start` was called while updates were already running.
    AlreadyRunning,
    /// `stop` was called without a running subscription.
    NotRunning { state: ControllerState },
    /// The platform positioning service is not available.
    GatewayUnavailable,
    /// The gateway refused or failed the subscription request.
    SubscriptionFailed { message: String },
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationError::AlreadyRunning => {
                write!(f, "updates already running; call stop() before start()")
            }
            LocationError::NotRunning { state } => {
                write!(f, "no running subscription to stop (state: {:?})", state)
            }
            LocationError::GatewayUnavailable => {
                write!(f, "platform positioning service unavailable")
            }
            LocationError::SubscriptionFailed { message } => {
                write!(f, "subscription failed: {}", message)
            }
        }
    }
}

impl std::error::Error for LocationError {}

/// Result type alias for location-updater operations.
pub type Result<T> = std::result::Result<T, LocationError>;
