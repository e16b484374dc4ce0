//! Host events: names, payload shapes and the host objects they carry.
//!
//! ## Contents
//! - [`names`] event names, one constant per supported host revision
//! - [`Payload`] and its typed event structs (legacy positional and typed shapes)
//! - host capability traits ([`RouteInfo`], [`QueueJob`], [`CommandInput`], [`Authenticatable`])
//!   plus plain-data implementations for hosts without their own objects
//!
//! Host objects are probed for capabilities: every optional capability returns
//! `Option` and defaults to `None`.

mod host;
pub mod names;
mod payload;

pub use host::{Authenticatable, CommandInput, JobInfo, QueueJob, RouteInfo, SimpleRoute, UserId};
pub use payload::{
    Authenticated, CommandFinished, CommandStarting, JobEvent, JobFailure, MessageLogged,
    Payload, QueryExecuted, RouteMatched, WorkerStopping,
};
