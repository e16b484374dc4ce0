//! Event names emitted by the host framework.
//!
//! Several logical events exist under two names: the legacy dotted name carries a
//! positional payload, the class-style name carries a typed payload. Both names are
//! subscribed and normalized to the same breadcrumb.

/// Route matched, legacy name (payload: [`Payload::Route`](crate::Payload::Route)).
pub const ROUTER_MATCHED: &str = "router.matched";
/// Route matched (payload: [`Payload::RouteMatched`](crate::Payload::RouteMatched)).
pub const ROUTE_MATCHED: &str = "Illuminate\\Routing\\Events\\RouteMatched";

/// Query executed, legacy name (payload: `[sql, bindings, time, connection]`).
pub const QUERY: &str = "illuminate.query";
/// Query executed (payload: [`Payload::QueryExecuted`](crate::Payload::QueryExecuted)).
pub const QUERY_EXECUTED: &str = "Illuminate\\Database\\Events\\QueryExecuted";

/// Message logged, legacy name (payload: `[level, message, context]`).
pub const LOG: &str = "illuminate.log";
/// Message logged (payload: [`Payload::MessageLogged`](crate::Payload::MessageLogged)).
pub const MESSAGE_LOGGED: &str = "Illuminate\\Log\\Events\\MessageLogged";

pub const COMMAND_STARTING: &str = "Illuminate\\Console\\Events\\CommandStarting";
pub const COMMAND_FINISHED: &str = "Illuminate\\Console\\Events\\CommandFinished";

pub const AUTHENTICATED: &str = "Illuminate\\Auth\\Events\\Authenticated";

pub const JOB_PROCESSING: &str = "Illuminate\\Queue\\Events\\JobProcessing";
pub const JOB_PROCESSED: &str = "Illuminate\\Queue\\Events\\JobProcessed";
pub const JOB_EXCEPTION_OCCURRED: &str = "Illuminate\\Queue\\Events\\JobExceptionOccurred";
pub const WORKER_STOPPING: &str = "Illuminate\\Queue\\Events\\WorkerStopping";
