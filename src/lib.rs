//! # telelogger
//!
//! **Telelogger** collects diagnostic breadcrumbs from a host application's
//! lifecycle events: matched routes, executed queries, log messages, console
//! commands and queue jobs.
//!
//! The trail is kept in order, in memory, for whatever error reporter sits above
//! it. Capture is best-effort: a payload that cannot be normalized is dropped and
//! counted, never raised into the host.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   host event bus (router, database, logger, console, queue)
//!        │ emit(name, payload)
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  SubscriptionRegistry                                             │
//! │  - General / Authentication / Queue groups (static tables)        │
//! │  - listen(name, cb) once per group                                │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Dispatcher                                                       │
//! │  - name → Handler (MissingHandler if unbound)                     │
//! │  - catch_unwind(Handler::normalize(flags, payload)) → [Effect]    │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               ▼
//!  BreadcrumbStore      ScopeState        FlushHandle      Diagnostics
//!  (ordered, ring)   (per context:     (bounded mpsc)   (counters, tracing,
//!                    JobScope stack,          │          DiagnosticBus)
//!                    identity, command)       ▼
//!                                          Flusher ──► Transport::flush(batch)
//! ```
//!
//! ### Lifecycle of one event
//! ```text
//! emit("Illuminate\Queue\Events\JobProcessing", payload)
//!   ├─► Handler::JobProcessing
//!   ├─► [EnterScope(job), Record(queue.job)]
//!   │       ├─ EnterScope ─► ScopeState push (tags saved)
//!   │       └─ Record     ─► BreadcrumbStore::add (seq, at, user stamped)
//!   └─ errors/panics ─► Diagnostics (NormalizerFailed / NormalizerPanicked)
//!
//! emit(".. JobProcessed" | ".. JobExceptionOccurred")
//!   └─► ExitScope ─► ScopeState pop (tags restored) | ScopeImbalance
//!
//! emit(".. WorkerStopping" | ".. CommandFinished")
//!   └─► Flush(reason) ─► Flusher drains store ─► Transport
//! ```
//!
//! ## Features
//! | Area              | Description                                                 | Key types / traits                        |
//! |-------------------|-------------------------------------------------------------|-------------------------------------------|
//! | **Collection**    | Wire groups onto a host bus and dispatch events.            | [`Collector`], [`SubscriptionGroup`]      |
//! | **Breadcrumbs**   | Ordered, optionally bounded trail of records.               | [`Breadcrumb`], [`BreadcrumbStore`]       |
//! | **Normalizers**   | One pure function per event kind.                           | [`Handler`], [`Effect`]                   |
//! | **Scopes**        | Per-context job bracketing with tag unwinding.              | [`ScopeState`], [`JobScope`]              |
//! | **Transport**     | Ship drained batches off the hot path.                      | [`Transport`], [`CollectorBuilder`]       |
//! | **Diagnostics**   | Swallowed failures, counted and logged.                     | [`Diagnostics`], [`Diagnostic`]           |
//! | **Log channel**   | Host log-driver handler.                                    | [`channel::ChannelHandler`]               |
//! | **Configuration** | Recorder switches and capacities.                           | [`Config`], [`RecorderFlags`]             |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use telelogger::events::{names, JobEvent, JobInfo};
//! use telelogger::{Collector, Config, LocalBus, Payload};
//!
//! let collector = Collector::new(Config::default());
//! let bus = LocalBus::new();
//! collector.subscribe_queue_events(&bus);
//!
//! let job = JobEvent {
//!     connection_name: "redis".to_string(),
//!     job: Arc::new(JobInfo { name: Some("SendMail".into()), ..JobInfo::default() }),
//! };
//! bus.emit(names::JOB_PROCESSING, &Payload::JobProcessing(job.clone())).unwrap();
//! assert_eq!(collector.scope_depth(), 1);
//!
//! bus.emit(names::JOB_PROCESSED, &Payload::JobProcessed(job)).unwrap();
//! assert_eq!(collector.scope_depth(), 0);
//! assert_eq!(collector.breadcrumbs()[0].data["job"], "SendMail");
//! ```
mod breadcrumbs;
mod config;
mod core;
mod diagnostics;
mod error;
mod normalizers;
mod subscriptions;
mod transport;

pub mod channel;
pub mod events;

// ---- Public re-exports ----

pub use breadcrumbs::{Breadcrumb, BreadcrumbStore, Category, Level, ParseLevelError};
pub use config::{Config, RecorderFlags};
pub use crate::core::{
    sync_with_worker_context, with_worker_context, Collector, CollectorBuilder, ContextKey,
    Dispatcher, JobScope, ScopeState,
};
pub use diagnostics::{
    Diagnostic, DiagnosticBus, DiagnosticCounts, DiagnosticKind, Diagnostics, DIAGNOSTIC_TARGET,
};
pub use error::{BuildError, ConfigError, DispatchError, NormalizeError, TransportError};
pub use events::Payload;
pub use normalizers::{substitute_bindings, Effect, Handler, NormalizerFn, Outcome, ANONYMOUS_HANDLER};
pub use subscriptions::{
    EventBus, EventSubscription, Listener, LocalBus, SubscriptionGroup, SubscriptionRegistry,
};
pub use transport::{FlushReason, NoopTransport, Transport};
