//! Lifecycle integration tests.
//!
//! Drives the full surface against a scripted gateway: configure, start,
//! deliver fixes through the receiver, query the best known fix, stop.
//! Both subscription generations are covered.
//!
//! Run with: `cargo test --test lifecycle`

use std::sync::{Arc, Mutex};

use location_updater::gateway::{FixDelivery, ProviderGateway};
use location_updater::{
    ControllerState, Criteria, Fix, FixNotification, LocationError, LocationListener, Position,
    Result, SubscriptionHandle, UpdateConfig, UpdateController, UpdateReceiver, NETWORK_PROVIDER,
};

/// What the scripted gateway saw, shared with the test body.
#[derive(Default)]
struct GatewayLog {
    subscribe_configs: Vec<UpdateConfig>,
    legacy_requests: Vec<(String, i64, f32)>,
    unsubscribed: Vec<SubscriptionHandle>,
    /// Delivery target captured at subscribe time, so the test can play
    /// the platform and push notifications through it.
    target: Option<Arc<dyn FixDelivery>>,
}

struct ScriptedGateway {
    unified: bool,
    providers: Vec<(String, Option<Fix>)>,
    log: Mutex<GatewayLog>,
}

impl ScriptedGateway {
    fn new(unified: bool) -> Self {
        Self {
            unified,
            providers: Vec::new(),
            log: Mutex::new(GatewayLog::default()),
        }
    }

    fn with_providers(mut self, providers: Vec<(String, Option<Fix>)>) -> Self {
        self.providers = providers;
        self
    }

    /// Deliver a notification to the captured target, as the platform would.
    fn push(&self, event: FixNotification) {
        let target = self
            .log
            .lock()
            .unwrap()
            .target
            .clone()
            .expect("no subscription active");
        target.on_fix_notification(event);
    }
}

impl ProviderGateway for ScriptedGateway {
    fn is_available(&self) -> bool {
        true
    }

    fn supports_unified_subscription(&self) -> bool {
        self.unified
    }

    fn list_providers(&self) -> Vec<String> {
        self.providers.iter().map(|(id, _)| id.clone()).collect()
    }

    fn last_known_fix(&self, provider_id: &str) -> Option<Fix> {
        self.providers
            .iter()
            .find(|(id, _)| id == provider_id)
            .and_then(|(_, fix)| fix.clone())
    }

    fn subscribe(
        &self,
        config: &UpdateConfig,
        target: Arc<dyn FixDelivery>,
    ) -> Result<SubscriptionHandle> {
        let mut log = self.log.lock().unwrap();
        log.subscribe_configs.push(config.clone());
        log.target = Some(target);
        Ok(SubscriptionHandle::new(log.subscribe_configs.len() as u64))
    }

    fn subscribe_legacy(
        &self,
        provider_id: &str,
        min_interval_ms: i64,
        min_distance_m: f32,
        target: Arc<dyn FixDelivery>,
    ) -> Result<SubscriptionHandle> {
        let mut log = self.log.lock().unwrap();
        log.legacy_requests
            .push((provider_id.to_string(), min_interval_ms, min_distance_m));
        log.target = Some(target);
        Ok(SubscriptionHandle::new(100 + log.legacy_requests.len() as u64))
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        let mut log = self.log.lock().unwrap();
        log.unsubscribed.push(handle);
        log.target = None;
    }
}

#[derive(Default)]
struct RecordingListener {
    events: Mutex<Vec<(String, Fix)>>,
}

impl LocationListener for RecordingListener {
    fn on_location_changed(&self, provider_id: &str, fix: &Fix) {
        self.events
            .lock()
            .unwrap()
            .push((provider_id.to_string(), fix.clone()));
    }
}

fn sample_fix(provider: &str, accuracy_m: f32, timestamp_ms: i64) -> Fix {
    Fix::new(provider, accuracy_m, timestamp_ms, Position::new(51.5074, -0.1278))
}

fn setup(unified: bool) -> (Arc<ScriptedGateway>, Arc<RecordingListener>, UpdateController) {
    let gateway = Arc::new(ScriptedGateway::new(unified).with_providers(vec![
        ("gps".to_string(), Some(sample_fix("gps", 5.0, 120_000))),
        ("network".to_string(), Some(sample_fix("network", 40.0, 110_000))),
        ("passive".to_string(), None),
    ]));
    let listener = Arc::new(RecordingListener::default());
    let receiver = Arc::new(UpdateReceiver::new(listener.clone()));
    let controller = UpdateController::new(gateway.clone(), receiver);
    (gateway, listener, controller)
}

// ============================================================================
// Test: Unified Subscription Round Trip
// ============================================================================

#[test]
fn test_unified_round_trip_with_delivery() {
    let (gateway, listener, mut controller) = setup(true);

    controller.set_interval(60_000).set_distance(50.0);
    controller.start().expect("start failed");
    assert_eq!(controller.state(), ControllerState::Running);

    // The gateway got the full configuration on the unified path.
    {
        let log = gateway.log.lock().unwrap();
        assert_eq!(log.subscribe_configs.len(), 1);
        assert_eq!(log.subscribe_configs[0].min_interval_ms, 60_000);
        assert_eq!(log.subscribe_configs[0].min_distance_m, 50.0);
        assert!(log.legacy_requests.is_empty());
    }

    // Platform pushes one good and one malformed event.
    let fix = sample_fix("gps", 3.0, 130_000);
    gateway.push(FixNotification::from_fix(&fix));
    gateway.push(FixNotification::new("gps", None));

    {
        let events = listener.events.lock().unwrap();
        assert_eq!(events.len(), 1, "only the valid event must be forwarded");
        assert_eq!(events[0].0, "gps");
        assert_eq!(events[0].1, fix);
    }

    controller.stop().expect("stop failed");
    assert_eq!(controller.state(), ControllerState::Idle);

    let log = gateway.log.lock().unwrap();
    assert_eq!(log.unsubscribed, vec![SubscriptionHandle::new(1)]);
}

// ============================================================================
// Test: Legacy Subscription Path
// ============================================================================

#[test]
fn test_legacy_path_ignores_criteria() {
    let (gateway, listener, mut controller) = setup(false);

    // Criteria is configured but must never reach the gateway.
    controller
        .set_criteria(Criteria::default())
        .set_interval(30_000)
        .set_distance(10.0)
        .start()
        .expect("start failed");

    {
        let log = gateway.log.lock().unwrap();
        assert!(log.subscribe_configs.is_empty(), "unified path must not be used");
        assert_eq!(
            log.legacy_requests,
            vec![(NETWORK_PROVIDER.to_string(), 30_000, 10.0)]
        );
    }

    // Delivery works the same on the degraded path.
    let fix = sample_fix("network", 60.0, 140_000);
    gateway.push(FixNotification::from_fix(&fix));
    assert_eq!(listener.events.lock().unwrap().len(), 1);

    controller.stop().expect("stop failed");
}

// ============================================================================
// Test: Lifecycle Preconditions
// ============================================================================

#[test]
fn test_lifecycle_preconditions() {
    let (_gateway, _listener, mut controller) = setup(true);

    assert_eq!(
        controller.stop(),
        Err(LocationError::NotRunning {
            state: ControllerState::Idle
        })
    );

    controller.start().unwrap();
    assert_eq!(controller.start(), Err(LocationError::AlreadyRunning));

    controller.stop().unwrap();
    // A second stop is an error again once idle.
    assert!(matches!(
        controller.stop(),
        Err(LocationError::NotRunning { .. })
    ));
}

// ============================================================================
// Test: Best-Fix Query Independence
// ============================================================================

#[test]
fn test_best_fix_query_in_every_state() {
    let (_gateway, _listener, mut controller) = setup(true);

    // Idle: gps (accuracy 5.0) beats network (40.0), both past threshold.
    let best = controller.last_best_known_fix().expect("expected a fix");
    assert_eq!(best.provider_id, "gps");

    controller.start().unwrap();
    assert_eq!(controller.last_best_known_fix().unwrap().provider_id, "gps");

    controller.stop().unwrap();
    assert_eq!(controller.last_best_known_fix().unwrap().provider_id, "gps");
}

#[test]
fn test_best_fix_query_none_when_nothing_reported() {
    let gateway = Arc::new(ScriptedGateway::new(true).with_providers(vec![
        ("gps".to_string(), None),
        ("network".to_string(), None),
    ]));
    let receiver = Arc::new(UpdateReceiver::new(Arc::new(RecordingListener::default())));
    let controller = UpdateController::new(gateway, receiver);

    assert!(controller.last_best_known_fix().is_none());
}
