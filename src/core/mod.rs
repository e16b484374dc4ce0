//! Runtime core: dispatch, scope bracketing, and flushing.
//!
//! The public entry point from this module is [`Collector`], which owns the store,
//! the dispatcher, the subscription registry, and the optional background flusher.
//!
//! Internal modules:
//! - [`scope`]: per-context JobScope stacks and identity/command tags;
//! - [`dispatcher`]: resolves the handler for an event and isolates its failures;
//! - [`flusher`]: background task shipping drained breadcrumbs to a [`Transport`](crate::Transport);
//! - [`collector`]: wires everything together;
//! - [`builder`]: constructs a [`Collector`] with optional features.

mod builder;
mod collector;
mod dispatcher;
mod flusher;
mod scope;

pub use builder::CollectorBuilder;
pub use collector::Collector;
pub use dispatcher::Dispatcher;
pub use scope::{sync_with_worker_context, with_worker_context, ContextKey, JobScope, ScopeState};

use std::any::Any;

/// Extracts the message of a caught panic payload.
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
