//! Notification endpoint between the platform transport and the listener.
//!
//! The receiver is deliberately stateless: it holds the single registered
//! listener and nothing of the controller, so the platform can invoke it
//! from any dispatch context while the controller is being queried or
//! stopped.

use std::sync::Arc;

use crate::gateway::{FixDelivery, FixNotification};
use crate::Fix;

/// Callback for normalized location updates.
///
/// Invoked zero or more times between `start` and `stop`, never before
/// `start`. A delivery already in flight when `stop` returns may still
/// arrive; callers must tolerate one trailing invocation.
pub trait LocationListener: Send + Sync {
    fn on_location_changed(&self, provider_id: &str, fix: &Fix);
}

/// Receives raw fix notifications and forwards them to one listener.
pub struct UpdateReceiver {
    listener: Arc<dyn LocationListener>,
}

impl UpdateReceiver {
    /// Create a receiver forwarding to `listener`. The listener is fixed
    /// for the receiver's lifetime.
    pub fn new(listener: Arc<dyn LocationListener>) -> Self {
        Self { listener }
    }
}

impl FixDelivery for UpdateReceiver {
    /// Decode one notification and forward it exactly once.
    ///
    /// Events without a payload, with a payload that does not decode to a
    /// fix, or with an out-of-range position are dropped without error.
    fn on_fix_notification(&self, event: FixNotification) {
        let payload = match event.payload {
            Some(payload) => payload,
            None => {
                log::debug!("[UpdateReceiver] notification without fix payload, dropping");
                return;
            }
        };

        let fix: Fix = match serde_json::from_value(payload) {
            Ok(fix) => fix,
            Err(err) => {
                log::debug!("[UpdateReceiver] undecodable fix payload, dropping: {}", err);
                return;
            }
        };

        if !fix.position.is_valid() {
            log::debug!(
                "[UpdateReceiver] fix from {} has out-of-range position, dropping",
                event.provider_id
            );
            return;
        }

        log::debug!("[UpdateReceiver] forwarding fix from {}", event.provider_id);
        self.listener.on_location_changed(&event.provider_id, &fix);
    }
}
