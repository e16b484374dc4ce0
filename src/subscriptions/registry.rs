//! # Subscription registry.
//!
//! Walks the static table of a [`SubscriptionGroup`] and, for each entry:
//! 1. binds the event name to its [`Handler`](crate::Handler) on the dispatcher;
//! 2. installs a listener on the host bus that forwards to the dispatcher.
//!
//! ```text
//! register_group(Queue, bus)
//!     ├─ already registered? ──► false (no-op)
//!     └─ for {event, handler} in QUEUE:
//!           dispatcher.bind(event, handler)
//!           bus.listen(event, |payload| dispatcher.dispatch(event, payload))
//! ```
//!
//! Binding happens before listening, so an installed listener always finds its handler.
//!
//! Registration is tracked per group, not per bus: a registry wires each group onto
//! exactly one host bus, and a later call with another bus installs nothing.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use crate::core::Dispatcher;
use crate::diagnostics::DIAGNOSTIC_TARGET;
use crate::events::Payload;

use super::{EventBus, Listener, SubscriptionGroup};

/// Tracks which groups have been installed.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    registered: Mutex<HashSet<SubscriptionGroup>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `group` on `bus`, routing to `dispatcher`.
    ///
    /// Returns `false` if the group was already registered, whichever bus it went to.
    pub fn register_group(
        &self,
        group: SubscriptionGroup,
        dispatcher: &Arc<Dispatcher>,
        bus: &dyn EventBus,
    ) -> bool {
        let mut registered = self.registered.lock().unwrap_or_else(PoisonError::into_inner);
        if !registered.insert(group) {
            return false;
        }

        for sub in group.subscriptions() {
            dispatcher.bind(sub.event, sub.handler);

            let d = Arc::clone(dispatcher);
            let event = sub.event;
            let listener: Listener = Arc::new(move |payload: &Payload| d.dispatch(event, payload));
            bus.listen(event, listener);
        }

        tracing::debug!(
            target: DIAGNOSTIC_TARGET,
            group = group.as_str(),
            events = group.subscriptions().len(),
            "subscription group registered"
        );
        true
    }

    pub fn is_registered(&self, group: SubscriptionGroup) -> bool {
        self.registered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::Collector;
    use crate::events::names;
    use crate::subscriptions::LocalBus;

    #[test]
    fn test_register_is_idempotent() {
        let collector = Collector::new(Config::default());
        let bus = LocalBus::new();

        assert!(collector.register_group(SubscriptionGroup::Queue, &bus));
        assert!(!collector.register_group(SubscriptionGroup::Queue, &bus));
        assert_eq!(bus.listener_count(names::JOB_PROCESSING), 1);
        assert!(collector.is_registered(SubscriptionGroup::Queue));
    }

    #[test]
    fn test_group_is_wired_onto_one_bus_only() {
        let collector = Collector::new(Config::default());
        let first = LocalBus::new();
        let second = LocalBus::new();

        assert!(collector.subscribe_queue_events(&first));
        assert!(!collector.subscribe_queue_events(&second));
        assert_eq!(first.listener_count(names::JOB_PROCESSED), 1);
        assert_eq!(second.listener_count(names::JOB_PROCESSED), 0);
    }

    #[test]
    fn test_groups_are_independent() {
        let collector = Collector::new(Config::default());
        let bus = LocalBus::new();

        collector.subscribe_auth_events(&bus);
        assert_eq!(bus.listener_count(names::AUTHENTICATED), 1);
        assert_eq!(bus.listener_count(names::QUERY), 0);
        assert!(!collector.is_registered(SubscriptionGroup::General));
    }
}
