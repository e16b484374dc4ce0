//! # Outward transport seam.
//!
//! Provides [`Transport`], the extension point that ships drained breadcrumbs to
//! a remote collector. No concrete network transport lives in this crate; hosts
//! plug one in through [`CollectorBuilder::with_transport`](crate::CollectorBuilder::with_transport).
//!
//! ## Rules
//! - `flush` runs on the flusher task, never inside a normalizer.
//! - Errors and panics are caught and reported as diagnostics; the batch is dropped
//!   (no retry policy is assumed).
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use telelogger::{Breadcrumb, Transport, TransportError};
//!
//! struct Stdout;
//!
//! #[async_trait]
//! impl Transport for Stdout {
//!     async fn flush(&self, records: Vec<Breadcrumb>) -> Result<(), TransportError> {
//!         for r in records {
//!             println!("{} {:?}", r.category, r.message);
//!         }
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &'static str { "stdout" }
//! }
//! ```

use async_trait::async_trait;

use crate::breadcrumbs::Breadcrumb;
use crate::error::TransportError;

/// Why a flush was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlushReason {
    /// A queue worker is shutting down.
    WorkerStopping,
    /// A CLI command finished.
    CommandFinished,
    /// The host called [`Collector::flush`](crate::Collector::flush).
    Manual,
    /// The collector is shutting down.
    Shutdown,
}

impl FlushReason {
    pub fn as_str(self) -> &'static str {
        match self {
            FlushReason::WorkerStopping => "worker_stopping",
            FlushReason::CommandFinished => "command_finished",
            FlushReason::Manual => "manual",
            FlushReason::Shutdown => "shutdown",
        }
    }
}

/// Destination for drained breadcrumbs.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Ships one batch, in append order.
    async fn flush(&self, records: Vec<Breadcrumb>) -> Result<(), TransportError>;

    /// Returns the transport name used in diagnostics.
    ///
    /// The default uses `type_name::<Self>()`; override it with something short.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Transport that accepts and discards every batch.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTransport;

#[async_trait]
impl Transport for NoopTransport {
    async fn flush(&self, _records: Vec<Breadcrumb>) -> Result<(), TransportError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
