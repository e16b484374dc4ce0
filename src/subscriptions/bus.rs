//! # Host event-bus seam.
//!
//! The collector only consumes the host's `listen(name, callback)` capability,
//! expressed as [`EventBus`]. [`LocalBus`] is a synchronous in-process
//! implementation for hosts without their own bus (and for tests).
//!
//! ## Rules
//! - Listeners run synchronously on the emitting context, in registration order.
//! - A listener error stops the emit and is returned to the emitter; only wiring
//!   defects ([`DispatchError`]) are ever returned by collector listeners.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::DispatchError;
use crate::events::Payload;

/// Callback installed on a host bus.
pub type Listener = Arc<dyn Fn(&Payload) -> Result<(), DispatchError> + Send + Sync>;

/// Host event bus, as seen by the collector.
pub trait EventBus {
    /// Registers `listener` for every future emission of `event`.
    fn listen(&self, event: &'static str, listener: Listener);
}

/// Synchronous in-process event bus.
#[derive(Default)]
pub struct LocalBus {
    listeners: RwLock<HashMap<&'static str, Vec<Listener>>>,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls every listener of `event` with `payload`.
    ///
    /// Returns the number of listeners invoked (0 for an event nobody listens to).
    ///
    /// # Errors
    /// The first listener error.
    pub fn emit(&self, event: &str, payload: &Payload) -> Result<usize, DispatchError> {
        // clone out so listeners may register further listeners
        let listeners = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event)
            .cloned()
            .unwrap_or_default();

        for listener in &listeners {
            listener(payload)?;
        }
        Ok(listeners.len())
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event)
            .map_or(0, Vec::len)
    }
}

impl EventBus for LocalBus {
    fn listen(&self, event: &'static str, listener: Listener) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(event)
            .or_default()
            .push(listener);
    }
}

impl fmt::Debug for LocalBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let events = self
            .listeners
            .read()
            .map(|l| l.len())
            .unwrap_or_default();
        f.debug_struct("LocalBus").field("events", &events).finish()
    }
}
