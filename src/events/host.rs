//! Capabilities consumed from host objects.
//!
//! The collector never assumes a host object exposes more than required: every
//! optional accessor returns `Option` and has a `None` default, so older host
//! revisions only implement what they have.

use serde_json::Value;

/// A resolved route.
pub trait RouteInfo: Send + Sync {
    /// Route name/alias, if the route was named.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Handler identifier, e.g. `UserController@show`.
    fn action_name(&self) -> Option<&str> {
        None
    }

    /// Raw URI pattern of the route.
    fn uri(&self) -> &str;
}

/// A queued job being processed by a worker.
pub trait QueueJob: Send + Sync {
    fn name(&self) -> Option<String> {
        None
    }

    fn queue(&self) -> Option<String> {
        None
    }

    fn attempts(&self) -> Option<u32> {
        None
    }

    /// Display name of the underlying job class (newer host revisions only).
    fn resolve_name(&self) -> Option<String> {
        None
    }
}

/// Parsed CLI input of a command.
pub trait CommandInput: Send + Sync {
    /// Renders the input as a single string, if the input supports it.
    fn render(&self) -> Option<String> {
        None
    }
}

/// An authenticated user.
pub trait Authenticatable: Send + Sync {
    /// Opaque identifier of the user (usually a primary key).
    fn auth_identifier(&self) -> Option<Value>;
}

/// Plain-data [`RouteInfo`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleRoute {
    pub name: Option<String>,
    pub action: Option<String>,
    pub uri: String,
}

impl SimpleRoute {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

impl RouteInfo for SimpleRoute {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn action_name(&self) -> Option<&str> {
        self.action.as_deref()
    }

    fn uri(&self) -> &str {
        &self.uri
    }
}

/// Plain-data [`QueueJob`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobInfo {
    pub name: Option<String>,
    pub queue: Option<String>,
    pub attempts: Option<u32>,
    pub resolved_name: Option<String>,
}

impl QueueJob for JobInfo {
    fn name(&self) -> Option<String> {
        self.name.clone()
    }

    fn queue(&self) -> Option<String> {
        self.queue.clone()
    }

    fn attempts(&self) -> Option<u32> {
        self.attempts
    }

    fn resolve_name(&self) -> Option<String> {
        self.resolved_name.clone()
    }
}

impl CommandInput for String {
    fn render(&self) -> Option<String> {
        Some(self.clone())
    }
}

/// Plain-data [`Authenticatable`] wrapping an identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct UserId(pub Value);

impl Authenticatable for UserId {
    fn auth_identifier(&self) -> Option<Value> {
        match &self.0 {
            Value::Null => None,
            v => Some(v.clone()),
        }
    }
}
