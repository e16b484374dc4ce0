//! # Broadcast bus for diagnostics.
//!
//! [`DiagnosticBus`] is a thin wrapper around [`tokio::sync::broadcast`].
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks and needs no runtime.
//! - **Bounded capacity**: one ring buffer shared by all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: diagnostics published with no receiver are dropped.

use tokio::sync::broadcast;

use super::event::Diagnostic;

/// Broadcast channel for [`Diagnostic`]s.
///
/// Cheap to clone (internally an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct DiagnosticBus {
    tx: broadcast::Sender<Diagnostic>,
}

impl DiagnosticBus {
    /// Creates a new bus; the minimum capacity is 1 (clamped).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Diagnostic>(capacity.max(1));
        Self { tx }
    }

    /// Publishes a diagnostic to all current receivers.
    pub fn publish(&self, d: Diagnostic) {
        let _ = self.tx.send(d);
    }

    /// Creates a receiver observing diagnostics published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Diagnostic> {
        self.tx.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
