//! # Collector: owns the capture pipeline for one host process.
//!
//! The [`Collector`] owns the shared [`BreadcrumbStore`], the [`Dispatcher`], the
//! [`SubscriptionRegistry`], the [`Diagnostics`] sink, and (when a transport is
//! configured) the background flusher.
//!
//! ## High-level architecture
//! ```text
//! host bus ── listen(name, cb) ◄── SubscriptionRegistry::register_group(group)
//!    │
//!    └── emit(name, payload) ──► cb ──► Dispatcher::dispatch(name, payload)
//!                                            │
//!                       ┌────────────────────┼──────────────────────┐
//!                       ▼                    ▼                      ▼
//!               BreadcrumbStore        ScopeState (per ctx)    FlushHandle ──► Flusher ──► Transport
//!
//! failures ──► Diagnostics ──► tracing (telelogger::diagnostic) + DiagnosticBus
//! ```
//!
//! ## Example
//! ```rust
//! use telelogger::{Collector, Config, LocalBus, Payload, SubscriptionGroup};
//! use telelogger::events::names;
//! use serde_json::json;
//!
//! let collector = Collector::new(Config::default());
//! let bus = LocalBus::new();
//! assert!(collector.subscribe(&bus));
//!
//! bus.emit(
//!     names::QUERY,
//!     &Payload::args([json!("select * from users where id = ?"), json!([42]), json!(1.5), json!("mysql")]),
//! )
//! .unwrap();
//!
//! let crumbs = collector.breadcrumbs();
//! assert_eq!(crumbs[0].data["query"], "select * from users where id = '42'");
//! assert!(!collector.register_group(SubscriptionGroup::General, &bus));
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use crate::breadcrumbs::{Breadcrumb, BreadcrumbStore};
use crate::config::{Config, RecorderFlags};
use crate::diagnostics::{DiagnosticCounts, Diagnostics};
use crate::error::DispatchError;
use crate::events::Payload;
use crate::subscriptions::{EventBus, SubscriptionGroup, SubscriptionRegistry};
use crate::transport::FlushReason;

use super::builder::CollectorBuilder;
use super::dispatcher::Dispatcher;
use super::flusher::Flusher;
use super::scope::{ContextKey, ScopeState};

/// In-process breadcrumb collector.
pub struct Collector {
    cfg: Config,
    store: Arc<BreadcrumbStore>,
    diagnostics: Arc<Diagnostics>,
    dispatcher: Arc<Dispatcher>,
    registry: SubscriptionRegistry,
    flusher: Mutex<Option<Flusher>>,
}

impl Collector {
    /// Creates a collector without a transport: breadcrumbs stay in the store and
    /// flush requests are no-ops.
    pub fn new(cfg: Config) -> Self {
        Self::builder(cfg).build_local()
    }

    /// Returns a builder for configuring the collector.
    pub fn builder(cfg: Config) -> CollectorBuilder {
        CollectorBuilder::new(cfg)
    }

    pub(super) fn new_internal(
        cfg: Config,
        store: Arc<BreadcrumbStore>,
        diagnostics: Arc<Diagnostics>,
        dispatcher: Arc<Dispatcher>,
        flusher: Option<Flusher>,
    ) -> Self {
        Self {
            cfg,
            store,
            diagnostics,
            dispatcher,
            registry: SubscriptionRegistry::new(),
            flusher: Mutex::new(flusher),
        }
    }

    /// Dispatches one host event directly, bypassing any bus.
    ///
    /// The event must have been bound by registering its group first.
    ///
    /// # Errors
    /// [`DispatchError::MissingHandler`] when `event` is not bound.
    pub fn dispatch(&self, event: &str, payload: &Payload) -> Result<(), DispatchError> {
        self.dispatcher.dispatch(event, payload)
    }

    /// Installs the listeners of `group` on `bus`.
    ///
    /// A collector serves one host bus. Returns `false` when the group was already
    /// registered, on this bus or any other, and installs nothing.
    pub fn register_group(&self, group: SubscriptionGroup, bus: &dyn EventBus) -> bool {
        self.registry.register_group(group, &self.dispatcher, bus)
    }

    /// Registers the general group (routes, queries, logs, commands).
    pub fn subscribe(&self, bus: &dyn EventBus) -> bool {
        self.register_group(SubscriptionGroup::General, bus)
    }

    pub fn subscribe_auth_events(&self, bus: &dyn EventBus) -> bool {
        self.register_group(SubscriptionGroup::Authentication, bus)
    }

    pub fn subscribe_queue_events(&self, bus: &dyn EventBus) -> bool {
        self.register_group(SubscriptionGroup::Queue, bus)
    }

    /// Returns `true` if `group` has been registered.
    pub fn is_registered(&self, group: SubscriptionGroup) -> bool {
        self.registry.is_registered(group)
    }

    pub fn store(&self) -> &Arc<BreadcrumbStore> {
        &self.store
    }

    /// Returns an ordered copy of the buffered breadcrumbs.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        self.store.snapshot()
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn flags(&self) -> &RecorderFlags {
        self.dispatcher.flags()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn counts(&self) -> DiagnosticCounts {
        self.diagnostics.counts()
    }

    /// Per-context scope stacks and tags.
    pub fn scopes(&self) -> &ScopeState {
        self.dispatcher.scopes()
    }

    /// Identity of the calling execution context, if an Authenticated event set one.
    pub fn identity(&self) -> Option<String> {
        self.dispatcher.scopes().identity(ContextKey::current())
    }

    /// Clears the identity of the calling execution context.
    ///
    /// Hosts serving requests outside a job scope must call this (or
    /// [`end_context`](Self::end_context)) when a request ends. Otherwise the next
    /// request on the same thread or worker records breadcrumbs under the previous user.
    pub fn clear_identity(&self) {
        self.dispatcher.scopes().clear_identity(ContextKey::current());
    }

    /// Forgets every scope and tag of the calling execution context.
    ///
    /// Thread contexts are forgotten automatically when their thread exits; bound
    /// worker contexts stay until this is called from inside the worker. Returns the
    /// number of job scopes that were still open.
    pub fn end_context(&self) -> usize {
        self.dispatcher.scopes().forget(ContextKey::current())
    }

    /// Command tag of the calling execution context.
    pub fn command(&self) -> Option<String> {
        self.dispatcher.scopes().command(ContextKey::current())
    }

    /// Number of open job scopes in the calling execution context.
    pub fn scope_depth(&self) -> usize {
        self.dispatcher.scopes().depth(ContextKey::current())
    }

    /// Returns `true` if a transport is configured.
    pub fn has_transport(&self) -> bool {
        self.dispatcher.flush_handle().is_some()
    }

    /// Requests a flush of the buffered breadcrumbs. Never blocks.
    ///
    /// Without a transport this does nothing.
    pub fn flush(&self) {
        if let Some(handle) = self.dispatcher.flush_handle() {
            handle.request(FlushReason::Manual);
        }
    }

    /// Stops the flusher after a final drain.
    ///
    /// Later flush requests are dropped and reported. Calling this twice, or
    /// without a transport, is a no-op.
    pub async fn shutdown(&self) {
        let flusher = self
            .flusher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(flusher) = flusher {
            flusher.shutdown().await;
        }
    }
}
