//! Platform positioning seam.
//!
//! Everything the controller needs from the host platform goes through the
//! [`ProviderGateway`] trait: provider enumeration, cached last-known fixes,
//! and the two generations of subscription entry points. Raw fix events
//! come back through [`FixDelivery`] as [`FixNotification`]s whose payload
//! stays an opaque JSON value until the receiver decodes it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::{Fix, UpdateConfig};

/// Satellite-based provider name.
pub const GPS_PROVIDER: &str = "gps";
/// Cell/wifi network provider name.
pub const NETWORK_PROVIDER: &str = "network";
/// Passive provider name: fixes produced on behalf of other clients.
pub const PASSIVE_PROVIDER: &str = "passive";

/// Opaque token for an active platform subscription.
///
/// Exclusively owned by the controller while running and released exactly
/// once via [`ProviderGateway::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A raw fix-changed event as delivered by the platform transport.
///
/// The payload is whatever the transport attached to the event. It may be
/// missing or fail to decode; the receiver drops such events silently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixNotification {
    /// Provider the platform attributes the event to.
    pub provider_id: String,
    /// Encoded fix, if the event carries one.
    pub payload: Option<Value>,
}

impl FixNotification {
    pub fn new(provider_id: &str, payload: Option<Value>) -> Self {
        Self {
            provider_id: provider_id.to_string(),
            payload,
        }
    }

    /// Build a well-formed notification carrying `fix` as its payload.
    pub fn from_fix(fix: &Fix) -> Self {
        Self {
            provider_id: fix.provider_id.clone(),
            payload: serde_json::to_value(fix).ok(),
        }
    }
}

/// Delivery target handed to the gateway at subscription time.
///
/// The platform invokes this from a dispatch context it owns; an
/// implementation must not assume any particular thread.
pub trait FixDelivery: Send + Sync {
    fn on_fix_notification(&self, event: FixNotification);
}

/// The host platform's positioning service.
///
/// Queries are expected to read a local device cache and return promptly;
/// no cancellation primitive is provided for them.
pub trait ProviderGateway: Send + Sync {
    /// Whether the positioning service can be reached at all.
    fn is_available(&self) -> bool;

    /// Whether the platform supports criteria-based subscriptions covering
    /// all matching providers at once.
    fn supports_unified_subscription(&self) -> bool;

    /// All provider names known to the platform, in platform-defined order.
    fn list_providers(&self) -> Vec<String>;

    /// The cached last-known fix for one provider, if it has ever reported.
    fn last_known_fix(&self, provider_id: &str) -> Option<Fix>;

    /// Subscribe with the full configuration; the platform arbitrates among
    /// all providers matching the criteria.
    fn subscribe(
        &self,
        config: &UpdateConfig,
        target: Arc<dyn FixDelivery>,
    ) -> Result<SubscriptionHandle>;

    /// Subscribe to exactly one named provider with interval and distance
    /// only. Entry point for platforms without unified subscriptions.
    fn subscribe_legacy(
        &self,
        provider_id: &str,
        min_interval_ms: i64,
        min_distance_m: f32,
        target: Arc<dyn FixDelivery>,
    ) -> Result<SubscriptionHandle>;

    /// Release an active subscription. Further deliveries are not
    /// guaranteed to stop instantly; one in-flight event may still arrive.
    fn unsubscribe(&self, handle: SubscriptionHandle);
}
