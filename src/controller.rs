//! Update lifecycle: configuration, start/stop and the best-fix query.
//!
//! ## Architecture
//!
//! The controller owns the configuration, the Idle/Running state and the
//! single subscription handle. It talks to the platform only through
//! [`ProviderGateway`] and never handles fixes itself; those land on the
//! [`UpdateReceiver`](crate::UpdateReceiver) passed in at construction.
//!
//! Controller methods are synchronous and unlocked: one owner drives
//! `start`/`stop` at a time. Fix delivery may still run concurrently with
//! any of them because the receiver shares no controller state.

use std::sync::Arc;

use crate::arbiter::select_best_fix;
use crate::error::{LocationError, Result};
use crate::gateway::{FixDelivery, ProviderGateway, SubscriptionHandle, NETWORK_PROVIDER};
use crate::receiver::UpdateReceiver;
use crate::{Criteria, Fix, UpdateConfig};

/// Lifecycle state of an [`UpdateController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// No active subscription. Initial state, restored by `stop`.
    Idle,
    /// Continuous updates are flowing to the receiver.
    Running,
}

/// Drives continuous location updates and answers best-fix queries.
///
/// Whether the gateway supports unified subscriptions is resolved once
/// here and fixed for the controller's lifetime, so both subscription
/// paths stay deterministic under test.
pub struct UpdateController {
    gateway: Arc<dyn ProviderGateway>,
    receiver: Arc<UpdateReceiver>,
    config: UpdateConfig,
    state: ControllerState,
    subscription: Option<SubscriptionHandle>,
    unified: bool,
}

impl UpdateController {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Create an idle controller with the default configuration.
    pub fn new(gateway: Arc<dyn ProviderGateway>, receiver: Arc<UpdateReceiver>) -> Self {
        Self::with_config(gateway, receiver, UpdateConfig::default())
    }

    /// Create an idle controller with a prepared configuration.
    pub fn with_config(
        gateway: Arc<dyn ProviderGateway>,
        receiver: Arc<UpdateReceiver>,
        config: UpdateConfig,
    ) -> Self {
        let unified = gateway.supports_unified_subscription();
        Self {
            gateway,
            receiver,
            config,
            state: ControllerState::Idle,
            subscription: None,
            unified,
        }
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Set the minimum time between updates in milliseconds.
    ///
    /// Read at `start`; changing it while running only takes effect after
    /// a stop/start cycle.
    pub fn set_interval(&mut self, min_interval_ms: i64) -> &mut Self {
        self.config.min_interval_ms = min_interval_ms;
        self
    }

    /// Set the minimum distance between updates in meters.
    ///
    /// Read at `start`; changing it while running only takes effect after
    /// a stop/start cycle.
    pub fn set_distance(&mut self, min_distance_m: f32) -> &mut Self {
        self.config.min_distance_m = min_distance_m;
        self
    }

    /// Set the provider-eligibility criteria. Ignored on the legacy path.
    ///
    /// Read at `start`; changing it while running only takes effect after
    /// a stop/start cycle.
    pub fn set_criteria(&mut self, criteria: Criteria) -> &mut Self {
        self.config.criteria = criteria;
        self
    }

    pub fn interval(&self) -> i64 {
        self.config.min_interval_ms
    }

    pub fn distance(&self) -> f32 {
        self.config.min_distance_m
    }

    pub fn criteria(&self) -> Criteria {
        self.config.criteria
    }

    pub fn config(&self) -> &UpdateConfig {
        &self.config
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ControllerState::Running
    }

    /// The best fix any provider currently has cached, or `None` if no
    /// provider has ever reported.
    ///
    /// Recomputed from the gateway on every call, never cached, and usable
    /// in any lifecycle state. See [`select_best_fix`] for the selection
    /// rules.
    pub fn last_best_known_fix(&self) -> Option<Fix> {
        let candidates = self
            .gateway
            .list_providers()
            .into_iter()
            .filter_map(|provider_id| self.gateway.last_known_fix(&provider_id));

        select_best_fix(candidates, self.config.min_interval_ms)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Start continuous updates.
    ///
    /// The first update can take up to the configured interval to arrive;
    /// use [`Self::last_best_known_fix`] for an immediate answer.
    ///
    /// Fails with [`LocationError::GatewayUnavailable`] when the platform
    /// service is down and [`LocationError::AlreadyRunning`] when called
    /// twice without an intervening `stop`. Nothing changes on failure.
    pub fn start(&mut self) -> Result<()> {
        if !self.gateway.is_available() {
            return Err(LocationError::GatewayUnavailable);
        }
        if self.state == ControllerState::Running {
            return Err(LocationError::AlreadyRunning);
        }

        log::debug!("[UpdateController] starting location updates");

        let target: Arc<dyn FixDelivery> = self.receiver.clone();
        let handle = if self.unified {
            log::debug!("[UpdateController] subscribing with criteria-based updates");
            self.gateway.subscribe(&self.config, target)?
        } else {
            // Degraded path: one hardcoded provider, criteria ignored.
            // TODO: support multiple providers on gateways without unified
            // subscriptions.
            log::debug!("[UpdateController] subscribing with legacy single-provider updates");
            self.gateway.subscribe_legacy(
                NETWORK_PROVIDER,
                self.config.min_interval_ms,
                self.config.min_distance_m,
                target,
            )?
        };

        self.subscription = Some(handle);
        self.state = ControllerState::Running;
        Ok(())
    }

    /// Stop continuous updates and release the subscription.
    ///
    /// Fails with [`LocationError::NotRunning`] when there is nothing to
    /// stop. One delivery already in flight may still reach the listener
    /// after this returns.
    pub fn stop(&mut self) -> Result<()> {
        if self.state != ControllerState::Running {
            return Err(LocationError::NotRunning { state: self.state });
        }

        // Running implies a held handle; take() enforces the single release.
        if let Some(handle) = self.subscription.take() {
            self.gateway.unsubscribe(handle);
        }
        self.state = ControllerState::Idle;

        log::debug!("[UpdateController] stopped location updates");
        Ok(())
    }
}

impl Drop for UpdateController {
    fn drop(&mut self) {
        // Last-resort release when a running controller is dropped without
        // stop(). After a normal stop the handle is already gone.
        if let Some(handle) = self.subscription.take() {
            log::debug!("[UpdateController] dropped while running, releasing subscription");
            self.gateway.unsubscribe(handle);
        }
    }
}
