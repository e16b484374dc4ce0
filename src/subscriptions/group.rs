//! Static subscription tables.

use crate::events::names;
use crate::normalizers::Handler;

/// Independently toggleable bundle of event bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionGroup {
    /// Routes, queries, logs and console commands.
    General,
    Authentication,
    /// Queue jobs and worker lifecycle.
    Queue,
}

/// One `{event name → handler}` binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSubscription {
    pub event: &'static str,
    pub handler: Handler,
}

const fn sub(event: &'static str, handler: Handler) -> EventSubscription {
    EventSubscription { event, handler }
}

const GENERAL: &[EventSubscription] = &[
    sub(names::ROUTER_MATCHED, Handler::RouterMatched),
    sub(names::ROUTE_MATCHED, Handler::RouteMatched),
    sub(names::QUERY, Handler::Query),
    sub(names::QUERY_EXECUTED, Handler::QueryExecuted),
    sub(names::LOG, Handler::Log),
    sub(names::MESSAGE_LOGGED, Handler::MessageLogged),
    sub(names::COMMAND_STARTING, Handler::CommandStarting),
    sub(names::COMMAND_FINISHED, Handler::CommandFinished),
];

const AUTHENTICATION: &[EventSubscription] = &[sub(names::AUTHENTICATED, Handler::Authenticated)];

const QUEUE: &[EventSubscription] = &[
    sub(names::JOB_PROCESSING, Handler::JobProcessing),
    sub(names::JOB_PROCESSED, Handler::JobProcessed),
    sub(names::JOB_EXCEPTION_OCCURRED, Handler::JobExceptionOccurred),
    sub(names::WORKER_STOPPING, Handler::WorkerStopping),
];

impl SubscriptionGroup {
    pub const ALL: [SubscriptionGroup; 3] = [
        SubscriptionGroup::General,
        SubscriptionGroup::Authentication,
        SubscriptionGroup::Queue,
    ];

    /// Returns the bindings of this group.
    pub fn subscriptions(self) -> &'static [EventSubscription] {
        match self {
            SubscriptionGroup::General => GENERAL,
            SubscriptionGroup::Authentication => AUTHENTICATION,
            SubscriptionGroup::Queue => QUEUE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SubscriptionGroup::General => "general",
            SubscriptionGroup::Authentication => "authentication",
            SubscriptionGroup::Queue => "queue",
        }
    }
}
