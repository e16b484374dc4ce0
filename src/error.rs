//! Error types used by the collector and its normalizers.
//!
//! This module defines the error enums crossing the crate's seams:
//!
//! - [`DispatchError`]: static wiring defects surfaced by the dispatcher (never swallowed).
//! - [`NormalizeError`]: failures while turning one host payload into breadcrumbs
//!   (always recovered at the dispatcher boundary).
//! - [`TransportError`]: failures reported by an outward [`Transport`](crate::Transport).
//! - [`ConfigError`] / [`BuildError`]: startup-time misconfiguration.
//!
//! Every type provides `as_label` for logs and diagnostic counters.

use thiserror::Error;

/// # Errors surfaced by [`Collector::dispatch`](crate::Collector::dispatch).
///
/// These are deployment-time defects: the subscription table and the dispatcher
/// bindings have drifted apart. They are returned to the caller instead of being
/// swallowed like normalizer failures.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// An event name reached the dispatcher with no bound handler.
    #[error("missing event handler for {event:?}")]
    MissingHandler {
        /// The event name that was dispatched.
        event: String,
    },
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use telelogger::DispatchError;
    ///
    /// let err = DispatchError::MissingHandler { event: "router.matched".into() };
    /// assert_eq!(err.as_label(), "dispatch_missing_handler");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::MissingHandler { .. } => "dispatch_missing_handler",
        }
    }
}

/// # Errors produced while normalizing a host payload.
///
/// None of these ever reach the host: the dispatcher reports them as diagnostics
/// and drops the breadcrumb.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// The payload variant does not match any shape the handler accepts.
    #[error("{handler}: expected {expected} payload, got {got}")]
    UnexpectedPayload {
        /// Handler that rejected the payload.
        handler: &'static str,
        /// Shape the handler accepts.
        expected: &'static str,
        /// Shape that was received.
        got: &'static str,
    },

    /// A positional (legacy) payload is shorter than the handler requires.
    #[error("{handler}: missing argument #{index} ({name})")]
    MissingArgument {
        handler: &'static str,
        index: usize,
        name: &'static str,
    },

    /// A positional argument has a JSON type the handler cannot use.
    #[error("{handler}: argument {name} must be {expected}")]
    InvalidArgument {
        handler: &'static str,
        name: &'static str,
        expected: &'static str,
    },

    /// The SQL text has more `?` placeholders than bindings.
    #[error("query has {placeholders} placeholders but only {bindings} bindings")]
    BindingMismatch { placeholders: usize, bindings: usize },

    /// The authenticated user exposes no identifier.
    #[error("authenticated user has no identifier")]
    MissingIdentity,

    /// The handler panicked; the message is the extracted panic payload.
    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl NormalizeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            NormalizeError::UnexpectedPayload { .. } => "normalize_unexpected_payload",
            NormalizeError::MissingArgument { .. } => "normalize_missing_argument",
            NormalizeError::InvalidArgument { .. } => "normalize_invalid_argument",
            NormalizeError::BindingMismatch { .. } => "normalize_binding_mismatch",
            NormalizeError::MissingIdentity => "normalize_missing_identity",
            NormalizeError::Panicked(_) => "normalize_panicked",
        }
    }

    /// Indicates whether the error came from a caught panic rather than a typed failure.
    pub fn is_panic(&self) -> bool {
        matches!(self, NormalizeError::Panicked(_))
    }
}

/// # Errors reported by an outward transport.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TransportError {
    /// The transport attempted the flush and failed.
    #[error("transport {transport} failed: {reason}")]
    Failed {
        transport: &'static str,
        reason: String,
    },

    /// The transport cannot accept records right now.
    #[error("transport {0} is unavailable")]
    Unavailable(&'static str),
}

impl TransportError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TransportError::Failed { .. } => "transport_failed",
            TransportError::Unavailable(_) => "transport_unavailable",
        }
    }
}

/// # Errors parsing recorder or channel options.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Options must be a JSON object keyed by option name.
    #[error("options must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// A recognized key carried a value of the wrong type.
    #[error("invalid options: {0}")]
    Invalid(#[from] serde_json::Error),
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::NotAnObject(_) => "config_not_an_object",
            ConfigError::Invalid(_) => "config_invalid",
        }
    }
}

/// # Errors building a [`Collector`](crate::Collector).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BuildError {
    /// A transport was configured but no tokio runtime is available for the flusher.
    #[error("a transport requires a running tokio runtime for the flusher task")]
    NoRuntime,
}

impl BuildError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            BuildError::NoRuntime => "build_no_runtime",
        }
    }
}
