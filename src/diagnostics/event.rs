//! # Diagnostic events.
//!
//! [`DiagnosticKind`] classifies what was swallowed; [`Diagnostic`] carries the
//! metadata (event name, handler, reason, batch size).
//!
//! ## Example
//! ```rust
//! use telelogger::{Diagnostic, DiagnosticKind};
//!
//! let d = Diagnostic::new(DiagnosticKind::FlushFailed)
//!     .with_handler("http")
//!     .with_reason("connection refused")
//!     .with_records(12);
//!
//! assert_eq!(d.kind, DiagnosticKind::FlushFailed);
//! assert_eq!(d.records, Some(12));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use crate::error::NormalizeError;
use crate::normalizers::Handler;
use crate::transport::FlushReason;

/// Sequence counter shared by every diagnostic in the process.
static DIAGNOSTIC_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A normalizer returned an error; its breadcrumb was dropped.
    ///
    /// Sets: `event`, `handler`, `reason`
    NormalizerFailed,

    /// A normalizer panicked; the panic was caught at the dispatcher boundary.
    ///
    /// Sets: `event`, `handler`, `reason` (panic message)
    NormalizerPanicked,

    /// A unit-end event arrived with no open scope in its execution context.
    ///
    /// Sets: `event`
    ScopeImbalance,

    /// A batch was delivered by the transport.
    ///
    /// Sets: `handler` (transport name), `reason` (flush reason), `records`
    FlushCompleted,

    /// The transport failed or panicked; the batch was dropped.
    ///
    /// Sets: `handler` (transport name), `reason`, `records`
    FlushFailed,

    /// A flush request was dropped (queue full, or flusher stopped).
    ///
    /// Sets: `reason`
    FlushDropped,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::NormalizerFailed => "normalizer_failed",
            DiagnosticKind::NormalizerPanicked => "normalizer_panicked",
            DiagnosticKind::ScopeImbalance => "scope_imbalance",
            DiagnosticKind::FlushCompleted => "flush_completed",
            DiagnosticKind::FlushFailed => "flush_failed",
            DiagnosticKind::FlushDropped => "flush_dropped",
        }
    }
}

/// Diagnostic with optional metadata.
///
/// - `seq`: monotonic sequence for ordering
/// - `at`: wall-clock timestamp
/// - other fields depend on the [`DiagnosticKind`]
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub seq: u64,
    pub at: SystemTime,
    pub kind: DiagnosticKind,
    /// Host event name, when the diagnostic came from a dispatch.
    pub event: Option<Arc<str>>,
    /// Handler or transport name.
    pub handler: Option<&'static str>,
    pub reason: Option<Arc<str>>,
    /// Size of the batch involved in a flush.
    pub records: Option<usize>,
}

impl Diagnostic {
    /// Creates a diagnostic of the given kind with current timestamp and next sequence number.
    pub fn new(kind: DiagnosticKind) -> Self {
        Self {
            seq: DIAGNOSTIC_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            event: None,
            handler: None,
            reason: None,
            records: None,
        }
    }

    #[inline]
    pub fn with_event(mut self, event: impl Into<Arc<str>>) -> Self {
        self.event = Some(event.into());
        self
    }

    #[inline]
    pub fn with_handler(mut self, handler: &'static str) -> Self {
        self.handler = Some(handler);
        self
    }

    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[inline]
    pub fn with_records(mut self, n: usize) -> Self {
        self.records = Some(n);
        self
    }

    /// Creates a normalizer failure (or panic) diagnostic.
    pub fn normalizer_failed(event: &str, handler: Handler, err: &NormalizeError) -> Self {
        let kind = if err.is_panic() {
            DiagnosticKind::NormalizerPanicked
        } else {
            DiagnosticKind::NormalizerFailed
        };
        Diagnostic::new(kind)
            .with_event(event)
            .with_handler(handler.name())
            .with_reason(err.to_string())
    }

    pub fn scope_imbalance(event: &str) -> Self {
        Diagnostic::new(DiagnosticKind::ScopeImbalance).with_event(event)
    }

    pub fn flush_dropped(reason: FlushReason, why: &'static str) -> Self {
        Diagnostic::new(DiagnosticKind::FlushDropped)
            .with_reason(format!("reason={} cause={why}", reason.as_str()))
    }

    #[inline]
    pub fn is_failure(&self) -> bool {
        !matches!(self.kind, DiagnosticKind::FlushCompleted)
    }
}
