//! # Breadcrumb record.
//!
//! A [`Breadcrumb`] describes one notable host event. Normalizers build it with
//! the `with_*` helpers; [`BreadcrumbStore::add`](super::BreadcrumbStore::add)
//! stamps `seq` and `at` when it is appended.
//!
//! ## Example
//! ```rust
//! use telelogger::{Breadcrumb, Category, Level};
//!
//! let crumb = Breadcrumb::new(Category::QueueJob)
//!     .with_level(Level::Info)
//!     .with_message("Processing queue job")
//!     .with_data("queue", "default")
//!     .with_data("attempts", 1);
//!
//! assert_eq!(crumb.category, Category::QueueJob);
//! assert_eq!(crumb.data["queue"], "default");
//! ```

use std::time::SystemTime;

use serde::Serialize;
use serde_json::{Map, Value};

use super::Level;

/// Breadcrumb classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    /// A route was matched for an incoming request.
    #[serde(rename = "route")]
    Route,
    /// A database query was executed.
    #[serde(rename = "sql.query")]
    Query,
    /// The host logged a message.
    #[serde(rename = "log")]
    Log,
    /// A queued job started processing.
    #[serde(rename = "queue.job")]
    QueueJob,
    /// A CLI command started or finished.
    #[serde(rename = "command")]
    Command,
}

impl Category {
    /// Returns the canonical string label for this category.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Route => "route",
            Self::Query => "sql.query",
            Self::Log => "log",
            Self::QueueJob => "queue.job",
            Self::Command => "command",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured record describing one host event.
///
/// - `seq`: position in the owning store (assigned at append)
/// - `at`: wall-clock timestamp (assigned at append)
/// - `user`: identity active in the emitting context, if any
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breadcrumb {
    pub seq: u64,
    pub at: SystemTime,
    pub category: Category,
    pub level: Level,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl Breadcrumb {
    /// Creates an `info` breadcrumb with empty data.
    pub fn new(category: Category) -> Self {
        Self {
            seq: 0,
            at: SystemTime::now(),
            category,
            level: Level::Info,
            message: None,
            data: Map::new(),
            user: None,
        }
    }

    #[inline]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[inline]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Inserts one data entry, replacing any previous value under `key`.
    #[inline]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Inserts a data entry only when `value` is present.
    #[inline]
    pub fn with_optional(self, key: impl Into<String>, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(v) => self.with_data(key, v),
            None => self,
        }
    }
}
