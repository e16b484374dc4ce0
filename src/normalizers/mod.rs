//! # Event normalizers.
//!
//! One pure function per supported event kind maps a raw [`Payload`] into a list
//! of [`Effect`]s. The dispatcher applies the effects in order; normalizers never
//! touch the store or the scope state themselves.
//!
//! ## Kind tag → function
//! [`Handler`] is the closed set of event kinds. Each variant resolves to exactly
//! one [`NormalizerFn`], so a bound event can never miss its function:
//! ```text
//! event name ──► SubscriptionGroup table ──► Handler ──► Handler::normalizer() ──► fn
//! ```
//!
//! ## Legacy shapes
//! Where the host emits the same logical event in two shapes, each shape has a
//! small adapter producing the same input struct, followed by one shared
//! normalization function.

mod args;
mod auth;
mod command;
mod log;
mod query;
mod queue;
mod route;

use crate::breadcrumbs::Breadcrumb;
use crate::config::RecorderFlags;
use crate::core::JobScope;
use crate::error::NormalizeError;
use crate::events::Payload;
use crate::transport::FlushReason;

pub use query::substitute_bindings;
pub use route::ANONYMOUS_HANDLER;

/// State change requested by a normalizer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append a breadcrumb to the store.
    Record(Breadcrumb),
    /// Open a unit-of-work scope in the current execution context.
    EnterScope(JobScope),
    /// Close the innermost scope of the current execution context.
    ExitScope,
    /// Set the identity of the current execution context.
    Identify(String),
    /// Set (or clear, with `None`) the command tag of the current execution context.
    TagCommand(Option<String>),
    /// Ask the flusher to ship buffered breadcrumbs.
    Flush(FlushReason),
}

/// Result of one normalizer invocation.
pub type Outcome = Result<Vec<Effect>, NormalizeError>;

/// Signature shared by every normalizer.
pub type NormalizerFn = fn(&RecorderFlags, &Payload) -> Outcome;

/// Closed set of supported event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    /// Legacy route-matched (bare route payload).
    RouterMatched,
    RouteMatched,
    /// Legacy query-executed (positional payload).
    Query,
    QueryExecuted,
    /// Legacy message-logged (positional payload).
    Log,
    MessageLogged,
    CommandStarting,
    CommandFinished,
    Authenticated,
    JobProcessing,
    JobProcessed,
    JobExceptionOccurred,
    WorkerStopping,
}

impl Handler {
    /// Returns the handler label used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Handler::RouterMatched => "router_matched",
            Handler::RouteMatched => "route_matched",
            Handler::Query => "query",
            Handler::QueryExecuted => "query_executed",
            Handler::Log => "log",
            Handler::MessageLogged => "message_logged",
            Handler::CommandStarting => "command_starting",
            Handler::CommandFinished => "command_finished",
            Handler::Authenticated => "authenticated",
            Handler::JobProcessing => "queue_job_processing",
            Handler::JobProcessed => "queue_job_processed",
            Handler::JobExceptionOccurred => "queue_job_exception_occurred",
            Handler::WorkerStopping => "queue_worker_stopping",
        }
    }

    /// Resolves the normalizer bound to this kind.
    pub fn normalizer(self) -> NormalizerFn {
        match self {
            Handler::RouterMatched => route::router_matched,
            Handler::RouteMatched => route::route_matched,
            Handler::Query => query::query,
            Handler::QueryExecuted => query::query_executed,
            Handler::Log => log::log,
            Handler::MessageLogged => log::message_logged,
            Handler::CommandStarting => command::command_starting,
            Handler::CommandFinished => command::command_finished,
            Handler::Authenticated => auth::authenticated,
            Handler::JobProcessing => queue::job_processing,
            Handler::JobProcessed => queue::job_processed,
            Handler::JobExceptionOccurred => queue::job_exception_occurred,
            Handler::WorkerStopping => queue::worker_stopping,
        }
    }

    /// Runs the bound normalizer.
    #[inline]
    pub fn normalize(self, flags: &RecorderFlags, payload: &Payload) -> Outcome {
        (self.normalizer())(flags, payload)
    }
}

pub(crate) fn unexpected(handler: Handler, expected: &'static str, payload: &Payload) -> NormalizeError {
    NormalizeError::UnexpectedPayload {
        handler: handler.name(),
        expected,
        got: payload.shape(),
    }
}
