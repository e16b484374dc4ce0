//! # Host event payloads.
//!
//! [`Payload`] covers both generations of host events:
//! - **legacy** events carry positional arguments ([`Payload::Args`]) or a bare
//!   route object ([`Payload::Route`]);
//! - **typed** events carry one struct per event class.
//!
//! Normalizers accept one or both shapes and reject anything else with
//! [`NormalizeError::UnexpectedPayload`](crate::NormalizeError::UnexpectedPayload).

use std::sync::Arc;

use serde_json::Value;

use super::host::{Authenticatable, CommandInput, QueueJob, RouteInfo};

/// Typed route-matched event.
#[derive(Clone)]
pub struct RouteMatched {
    pub route: Arc<dyn RouteInfo>,
}

/// Typed query-executed event.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryExecuted {
    pub sql: String,
    pub bindings: Vec<Value>,
    /// Execution time in milliseconds, when the host measured it.
    pub time: Option<f64>,
    pub connection_name: String,
}

/// Typed message-logged event.
#[derive(Clone, Debug, PartialEq)]
pub struct MessageLogged {
    pub level: String,
    pub message: String,
    /// Structured context; anything but an object is treated as empty.
    pub context: Value,
}

#[derive(Clone)]
pub struct Authenticated {
    pub guard: Option<String>,
    pub user: Arc<dyn Authenticatable>,
}

#[derive(Clone)]
pub struct CommandStarting {
    /// Command name; hosts emit an empty or missing name for the bare entrypoint.
    pub command: Option<String>,
    pub input: Option<Arc<dyn CommandInput>>,
}

#[derive(Clone)]
pub struct CommandFinished {
    pub command: Option<String>,
    pub input: Option<Arc<dyn CommandInput>>,
    pub exit_code: i32,
}

/// Payload of the job processing/processed events.
#[derive(Clone)]
pub struct JobEvent {
    pub connection_name: String,
    pub job: Arc<dyn QueueJob>,
}

/// Payload of the job-exception event.
#[derive(Clone)]
pub struct JobFailure {
    pub connection_name: String,
    pub job: Arc<dyn QueueJob>,
    pub exception: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerStopping {
    pub status: i32,
}

/// Raw payload handed over by the host event bus.
#[derive(Clone)]
pub enum Payload {
    /// Legacy positional arguments.
    Args(Vec<Value>),
    /// Legacy route-matched payload: the route itself.
    Route(Arc<dyn RouteInfo>),
    RouteMatched(RouteMatched),
    QueryExecuted(QueryExecuted),
    MessageLogged(MessageLogged),
    Authenticated(Authenticated),
    CommandStarting(CommandStarting),
    CommandFinished(CommandFinished),
    JobProcessing(JobEvent),
    JobProcessed(JobEvent),
    JobExceptionOccurred(JobFailure),
    WorkerStopping(WorkerStopping),
}

impl Payload {
    /// Returns the shape label used in diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            Payload::Args(_) => "args",
            Payload::Route(_) => "route",
            Payload::RouteMatched(_) => "route_matched",
            Payload::QueryExecuted(_) => "query_executed",
            Payload::MessageLogged(_) => "message_logged",
            Payload::Authenticated(_) => "authenticated",
            Payload::CommandStarting(_) => "command_starting",
            Payload::CommandFinished(_) => "command_finished",
            Payload::JobProcessing(_) => "job_processing",
            Payload::JobProcessed(_) => "job_processed",
            Payload::JobExceptionOccurred(_) => "job_exception_occurred",
            Payload::WorkerStopping(_) => "worker_stopping",
        }
    }

    /// Shorthand for a legacy positional payload.
    pub fn args<I, V>(args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Payload::Args(args.into_iter().map(Into::into).collect())
    }
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Payload::Args(args) => f.debug_tuple("Args").field(args).finish(),
            Payload::QueryExecuted(q) => f.debug_tuple("QueryExecuted").field(q).finish(),
            Payload::MessageLogged(m) => f.debug_tuple("MessageLogged").field(m).finish(),
            Payload::WorkerStopping(w) => f.debug_tuple("WorkerStopping").field(w).finish(),
            other => f.debug_tuple("Payload").field(&other.shape()).finish(),
        }
    }
}
