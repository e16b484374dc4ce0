//! Subscription groups and the host bus seam.
//!
//! - [`SubscriptionGroup`] / [`EventSubscription`]: the closed `{event → handler}` tables
//! - [`EventBus`] / [`LocalBus`]: where listeners are installed
//! - [`SubscriptionRegistry`]: installs a group once

mod bus;
mod group;
mod registry;

pub use bus::{EventBus, Listener, LocalBus};
pub use group::{EventSubscription, SubscriptionGroup};
pub use registry::SubscriptionRegistry;
