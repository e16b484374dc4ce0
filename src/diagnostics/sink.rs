//! Diagnostic counters and fan-out.

use std::sync::atomic::{AtomicU64, Ordering};

use super::{Diagnostic, DiagnosticBus, DiagnosticKind, DIAGNOSTIC_TARGET};

/// Point-in-time copy of the diagnostic counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticCounts {
    pub normalizer_failures: u64,
    pub normalizer_panics: u64,
    pub scope_imbalances: u64,
    pub flushes: u64,
    pub flush_failures: u64,
    pub flushes_dropped: u64,
}

/// Counts, logs and publishes diagnostics for one collector.
#[derive(Debug)]
pub struct Diagnostics {
    bus: DiagnosticBus,
    normalizer_failures: AtomicU64,
    normalizer_panics: AtomicU64,
    scope_imbalances: AtomicU64,
    flushes: AtomicU64,
    flush_failures: AtomicU64,
    flushes_dropped: AtomicU64,
}

impl Diagnostics {
    pub fn new(bus: DiagnosticBus) -> Self {
        Self {
            bus,
            normalizer_failures: AtomicU64::new(0),
            normalizer_panics: AtomicU64::new(0),
            scope_imbalances: AtomicU64::new(0),
            flushes: AtomicU64::new(0),
            flush_failures: AtomicU64::new(0),
            flushes_dropped: AtomicU64::new(0),
        }
    }

    /// Records one diagnostic. Never fails, never blocks.
    pub fn report(&self, d: Diagnostic) {
        let counter = match d.kind {
            DiagnosticKind::NormalizerFailed => &self.normalizer_failures,
            DiagnosticKind::NormalizerPanicked => &self.normalizer_panics,
            DiagnosticKind::ScopeImbalance => &self.scope_imbalances,
            DiagnosticKind::FlushCompleted => &self.flushes,
            DiagnosticKind::FlushFailed => &self.flush_failures,
            DiagnosticKind::FlushDropped => &self.flushes_dropped,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        let event = d.event.as_deref().unwrap_or("-");
        let handler = d.handler.unwrap_or("-");
        let reason = d.reason.as_deref().unwrap_or("-");
        if d.is_failure() {
            tracing::debug!(
                target: DIAGNOSTIC_TARGET,
                kind = d.kind.as_str(),
                event,
                handler,
                reason,
                records = d.records,
                "breadcrumb capture degraded"
            );
        } else {
            tracing::trace!(
                target: DIAGNOSTIC_TARGET,
                kind = d.kind.as_str(),
                handler,
                reason,
                records = d.records,
                "breadcrumbs flushed"
            );
        }

        self.bus.publish(d);
    }

    pub fn counts(&self) -> DiagnosticCounts {
        DiagnosticCounts {
            normalizer_failures: self.normalizer_failures.load(Ordering::Relaxed),
            normalizer_panics: self.normalizer_panics.load(Ordering::Relaxed),
            scope_imbalances: self.scope_imbalances.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
            flush_failures: self.flush_failures.load(Ordering::Relaxed),
            flushes_dropped: self.flushes_dropped.load(Ordering::Relaxed),
        }
    }

    pub fn bus(&self) -> &DiagnosticBus {
        &self.bus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_per_kind_and_publishes() {
        let diags = Diagnostics::new(DiagnosticBus::new(8));
        let mut rx = diags.bus().subscribe();
        assert_eq!(diags.bus().receiver_count(), 1);

        diags.report(Diagnostic::scope_imbalance("job.processed"));
        diags.report(Diagnostic::new(DiagnosticKind::NormalizerFailed));
        diags.report(Diagnostic::new(DiagnosticKind::NormalizerFailed));

        let counts = diags.counts();
        assert_eq!(counts.scope_imbalances, 1);
        assert_eq!(counts.normalizer_failures, 2);
        assert_eq!(counts.flush_failures, 0);

        let first = rx.try_recv().unwrap();
        assert_eq!(first.kind, DiagnosticKind::ScopeImbalance);
        assert_eq!(first.event.as_deref(), Some("job.processed"));
    }

    #[test]
    fn test_report_without_receivers_is_fine() {
        let diags = Diagnostics::new(DiagnosticBus::new(1));
        assert_eq!(diags.bus().receiver_count(), 0);
        for _ in 0..5 {
            diags.report(Diagnostic::new(DiagnosticKind::FlushDropped));
        }
        assert_eq!(diags.counts().flushes_dropped, 5);
    }
}
