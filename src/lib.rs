//! # Location Updater
//!
//! A thin facade over a host positioning service. Instead of juggling
//! provider names, last-known caches and two generations of subscription
//! APIs, callers get:
//!
//! - one listener, delivered location fixes after [`UpdateController::start`]
//! - one switch: [`UpdateController::start`] / [`UpdateController::stop`]
//! - one query: [`UpdateController::last_best_known_fix`], usable at any time
//!
//! The platform itself sits behind the [`ProviderGateway`] trait, so the
//! whole lifecycle is testable without a device. The controller picks the
//! richer subscription entry point when the gateway supports it and falls
//! back to a single network-provider subscription on older platforms.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use location_updater::{
//!     Criteria, Fix, LocationListener, UpdateController, UpdateReceiver,
//! };
//! # use location_updater::{Result, SubscriptionHandle, UpdateConfig};
//! # use location_updater::gateway::{FixDelivery, ProviderGateway};
//! # struct NullGateway;
//! # impl ProviderGateway for NullGateway {
//! #     fn is_available(&self) -> bool { true }
//! #     fn supports_unified_subscription(&self) -> bool { true }
//! #     fn list_providers(&self) -> Vec<String> { Vec::new() }
//! #     fn last_known_fix(&self, _provider_id: &str) -> Option<Fix> { None }
//! #     fn subscribe(&self, _config: &UpdateConfig, _target: Arc<dyn FixDelivery>)
//! #         -> Result<SubscriptionHandle> { Ok(SubscriptionHandle::new(1)) }
//! #     fn subscribe_legacy(&self, _provider_id: &str, _min_interval_ms: i64,
//! #         _min_distance_m: f32, _target: Arc<dyn FixDelivery>)
//! #         -> Result<SubscriptionHandle> { Ok(SubscriptionHandle::new(1)) }
//! #     fn unsubscribe(&self, _handle: SubscriptionHandle) {}
//! # }
//!
//! struct PrintListener;
//!
//! impl LocationListener for PrintListener {
//!     fn on_location_changed(&self, provider_id: &str, fix: &Fix) {
//!         println!("{provider_id}: {:?}", fix.position);
//!     }
//! }
//!
//! # fn main() -> location_updater::Result<()> {
//! # let gateway = Arc::new(NullGateway);
//! let receiver = Arc::new(UpdateReceiver::new(Arc::new(PrintListener)));
//! let mut updater = UpdateController::new(gateway, receiver);
//!
//! updater
//!     .set_interval(30 * 60 * 1000)
//!     .set_distance(100.0)
//!     .set_criteria(Criteria::default())
//!     .start()?;
//!
//! // ... fixes arrive at PrintListener until:
//! updater.stop()?;
//! # Ok(())
//! # }
//! ```
//!
//! The first continuous update can take up to the configured interval to
//! arrive. For an immediate answer, `last_best_known_fix` reads every
//! provider's cached fix and arbitrates among them synchronously.

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{LocationError, Result};

// Platform positioning seam (gateway trait, subscription handle, raw events)
pub mod gateway;
pub use gateway::{
    FixDelivery, FixNotification, ProviderGateway, SubscriptionHandle, GPS_PROVIDER,
    NETWORK_PROVIDER, PASSIVE_PROVIDER,
};

// Best-fix arbitration across providers
pub mod arbiter;
pub use arbiter::select_best_fix;

// Update lifecycle (configuration, start/stop, best-fix query)
pub mod controller;
pub use controller::{ControllerState, UpdateController};

// Notification endpoint (raw event -> listener)
pub mod receiver;
pub use receiver::{LocationListener, UpdateReceiver};

// ============================================================================
// Core Types
// ============================================================================

/// A geographic position reported by a provider.
///
/// Arbitration never looks inside a position; selection compares only
/// accuracy and timestamps. The validity check exists for the receiver,
/// which refuses to forward payloads with out-of-range coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Altitude in meters, when the provider reports one.
    pub altitude_m: Option<f64>,
}

impl Position {
    /// Create a position without altitude.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude_m: None,
        }
    }

    /// Check that the coordinates are finite and in range.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// A single position observation from one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    /// Name of the provider that produced the fix (e.g. "gps", "network").
    pub provider_id: String,
    /// Estimated accuracy radius in meters. Lower is better.
    pub accuracy_m: f32,
    /// Observation time in milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
    /// The reported position.
    pub position: Position,
}

impl Fix {
    pub fn new(provider_id: &str, accuracy_m: f32, timestamp_ms: i64, position: Position) -> Self {
        Self {
            provider_id: provider_id.to_string(),
            accuracy_m,
            timestamp_ms,
            position,
        }
    }
}

/// How precisely the caller wants fixes located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccuracyLevel {
    /// Finest available, typically satellite-based providers.
    Fine,
    /// Coarse, typically cell/wifi network providers.
    Coarse,
}

/// How much power the caller is willing to spend on fixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerLevel {
    Low,
    Medium,
    High,
    NoRequirement,
}

/// Desired accuracy/power trade-off used to pick eligible providers.
///
/// Only honored on platforms whose gateway supports unified subscriptions;
/// the legacy path subscribes to the network provider and ignores criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    pub accuracy: AccuracyLevel,
    pub power: PowerLevel,
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            accuracy: AccuracyLevel::Fine,
            power: PowerLevel::NoRequirement,
        }
    }
}

/// Configuration for a continuous update subscription.
///
/// Values are only read at [`UpdateController::start`]; changing them while
/// updates are running takes effect on the next stop/start cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// Provider-eligibility criteria. Ignored on the legacy path.
    pub criteria: Criteria,
    /// Minimum time between updates in milliseconds. Must be >= 0.
    pub min_interval_ms: i64,
    /// Minimum distance between updates in meters. Must be >= 0.
    pub min_distance_m: f32,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            criteria: Criteria::default(),
            min_interval_ms: 60 * 1000,
            min_distance_m: 100.0,
        }
    }
}

impl UpdateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum time between updates in milliseconds.
    pub fn interval(mut self, min_interval_ms: i64) -> Self {
        self.min_interval_ms = min_interval_ms;
        self
    }

    /// Set the minimum distance between updates in meters.
    pub fn distance(mut self, min_distance_m: f32) -> Self {
        self.min_distance_m = min_distance_m;
        self
    }

    /// Set the provider-eligibility criteria.
    pub fn criteria(mut self, criteria: Criteria) -> Self {
        self.criteria = criteria;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
