//! Side-channel diagnostics: what the collector swallowed and why.
//!
//! Nothing here reaches the host's primary log. Each [`Diagnostic`] is
//! - counted by [`Diagnostics`] (see [`DiagnosticCounts`]),
//! - logged through `tracing` on the [`DIAGNOSTIC_TARGET`] target,
//! - published on the [`DiagnosticBus`] for optional receivers.
//!
//! ```text
//! Dispatcher / Flusher ── report(Diagnostic) ──► Diagnostics
//!                                                  ├─► counters
//!                                                  ├─► tracing (target = "telelogger::diagnostic")
//!                                                  └─► DiagnosticBus ──► receivers (if any)
//! ```

mod bus;
mod event;
mod sink;

/// `tracing` target for every diagnostic line emitted by this crate.
pub const DIAGNOSTIC_TARGET: &str = "telelogger::diagnostic";

pub use bus::DiagnosticBus;
pub use event::{Diagnostic, DiagnosticKind};
pub use sink::{DiagnosticCounts, Diagnostics};
