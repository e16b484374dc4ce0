//! # Background flush worker.
//!
//! Provides [`Flusher`], a single tokio task that drains the [`BreadcrumbStore`] and
//! hands each batch to the configured [`Transport`], and [`FlushHandle`], the
//! non-blocking request side used by the dispatcher.
//!
//! ## Architecture
//! ```text
//! Effect::Flush(reason) ──► FlushHandle::request ──► [mpsc queue] ──► flusher task
//!                              (try_send)             (bounded)          │
//!                                 │                                      ├─ store.drain()
//!                                 └─ full/closed → FlushDropped          └─ catch_unwind(transport.flush(batch))
//!                                                                             ├─ Ok      → FlushCompleted
//!                                                                             └─ Err/panic → FlushFailed (batch lost)
//! ```
//!
//! ## Rules
//! - Requests never block the emitting context; on overflow the request is dropped
//!   (the breadcrumbs stay buffered for the next flush).
//! - Empty batches are skipped.
//! - Shutdown cancels the task and performs one final drain.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::breadcrumbs::BreadcrumbStore;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::transport::{FlushReason, Transport};

use super::panic_message;

/// Request side of the flush queue.
#[derive(Clone)]
pub(crate) struct FlushHandle {
    tx: mpsc::Sender<FlushReason>,
    diagnostics: Arc<Diagnostics>,
}

impl FlushHandle {
    /// Queues a flush request without waiting.
    pub(crate) fn request(&self, reason: FlushReason) {
        let why = match self.tx.try_send(reason) {
            Ok(()) => return,
            Err(mpsc::error::TrySendError::Full(_)) => "full",
            Err(mpsc::error::TrySendError::Closed(_)) => "closed",
        };
        self.diagnostics.report(Diagnostic::flush_dropped(reason, why));
    }
}

/// Owns the flusher task.
pub(crate) struct Flusher {
    worker: JoinHandle<()>,
    token: CancellationToken,
}

impl Flusher {
    /// Spawns the worker on `runtime` and returns it with its request handle.
    ///
    /// Minimum queue capacity is 1 (enforced).
    pub(crate) fn spawn(
        runtime: &Handle,
        transport: Arc<dyn Transport>,
        store: Arc<BreadcrumbStore>,
        diagnostics: Arc<Diagnostics>,
        capacity: usize,
    ) -> (Self, FlushHandle) {
        let (tx, mut rx) = mpsc::channel::<FlushReason>(capacity.max(1));
        let token = CancellationToken::new();
        let handle = FlushHandle {
            tx,
            diagnostics: Arc::clone(&diagnostics),
        };

        let stop = token.clone();
        let worker = runtime.spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = stop.cancelled() => break,
                    req = rx.recv() => match req {
                        Some(reason) => flush_once(transport.as_ref(), &store, &diagnostics, reason).await,
                        None => break,
                    },
                }
            }
            rx.close();
            flush_once(transport.as_ref(), &store, &diagnostics, FlushReason::Shutdown).await;
        });

        (Self { worker, token }, handle)
    }

    /// Stops the worker after a final drain and waits for it to finish.
    pub(crate) async fn shutdown(self) {
        self.token.cancel();
        let _ = self.worker.await;
    }
}

async fn flush_once(
    transport: &dyn Transport,
    store: &BreadcrumbStore,
    diagnostics: &Diagnostics,
    reason: FlushReason,
) {
    let batch = store.drain();
    if batch.is_empty() {
        return;
    }
    let records = batch.len();

    let diag = match AssertUnwindSafe(transport.flush(batch)).catch_unwind().await {
        Ok(Ok(())) => Diagnostic::new(DiagnosticKind::FlushCompleted).with_reason(reason.as_str()),
        Ok(Err(err)) => Diagnostic::new(DiagnosticKind::FlushFailed).with_reason(err.to_string()),
        Err(panic_err) => Diagnostic::new(DiagnosticKind::FlushFailed)
            .with_reason(format!("transport panicked: {}", panic_message(panic_err))),
    };
    diagnostics.report(diag.with_handler(transport.name()).with_records(records));
}
