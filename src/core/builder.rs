use std::sync::Arc;

use tokio::runtime::Handle;

use crate::{
    breadcrumbs::BreadcrumbStore,
    config::Config,
    diagnostics::{DiagnosticBus, Diagnostics},
    error::BuildError,
    transport::Transport,
};
use super::{collector::Collector, dispatcher::Dispatcher, flusher::Flusher};

/// Builder for constructing a Collector with optional features.
pub struct CollectorBuilder {
    cfg: Config,
    store: Option<Arc<BreadcrumbStore>>,
    transport: Option<Arc<dyn Transport>>,
}

impl CollectorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            store: None,
            transport: None,
        }
    }

    /// Uses an existing store instead of creating one from `Config::store_capacity`.
    ///
    /// Lets several collectors (or the host's error reporter) share one trail.
    pub fn with_store(mut self, store: Arc<BreadcrumbStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the transport that receives drained breadcrumbs.
    ///
    /// A background flusher task is spawned on the current tokio runtime at build time.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builds and returns the Collector instance.
    ///
    /// This consumes the builder and initializes:
    /// - Diagnostic bus and counters
    /// - Breadcrumb store (unless one was supplied)
    /// - Flusher task (if a transport is configured)
    /// - Dispatcher
    ///
    /// # Errors
    /// [`BuildError::NoRuntime`] when a transport is configured outside a tokio runtime.
    pub fn build(mut self) -> Result<Collector, BuildError> {
        let flushing = match self.transport.take() {
            Some(transport) => {
                let runtime = Handle::try_current().map_err(|_| BuildError::NoRuntime)?;
                Some((transport, runtime))
            }
            None => None,
        };
        Ok(self.assemble(flushing))
    }

    /// Builds without a transport; cannot fail.
    pub(super) fn build_local(self) -> Collector {
        self.assemble(None)
    }

    fn assemble(self, flushing: Option<(Arc<dyn Transport>, Handle)>) -> Collector {
        let bus = DiagnosticBus::new(self.cfg.diagnostic_capacity_clamped());
        let diagnostics = Arc::new(Diagnostics::new(bus));
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(BreadcrumbStore::new(self.cfg.store_bound())));

        let (flusher, flush) = match flushing {
            Some((transport, runtime)) => {
                let (flusher, handle) = Flusher::spawn(
                    &runtime,
                    transport,
                    Arc::clone(&store),
                    Arc::clone(&diagnostics),
                    self.cfg.flush_queue_clamped(),
                );
                (Some(flusher), Some(handle))
            }
            None => (None, None),
        };

        let dispatcher = Arc::new(Dispatcher::new(
            self.cfg.flags,
            Arc::clone(&store),
            Arc::clone(&diagnostics),
            flush,
        ));
        Collector::new_internal(self.cfg, store, diagnostics, dispatcher, flusher)
    }
}
