//! # Collector configuration.
//!
//! Provides [`Config`] (runtime settings for one collector) and [`RecorderFlags`]
//! (per-normalizer enable switches).
//!
//! Both are supplied once at construction and are read-only afterward: toggling
//! a flag means building a new [`Collector`](crate::Collector).
//!
//! ## Sentinel values
//! - `store_capacity = 0` → unbounded breadcrumb store
//!
//! ## Options
//! Hosts usually carry the flags in their own configuration files. A plain JSON
//! object with camelCase keys is accepted:
//! ```rust
//! use telelogger::RecorderFlags;
//!
//! let flags = RecorderFlags::from_options(&serde_json::json!({
//!     "recordSqlQueries": false,
//! })).unwrap();
//!
//! assert!(!flags.record_sql_queries);
//! assert!(flags.record_logs); // missing keys default to enabled
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;

/// Per-normalizer enable switches.
///
/// Every switch defaults to `true`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecorderFlags {
    /// Record executed SQL queries.
    pub record_sql_queries: bool,
    /// Substitute bindings into recorded SQL (raw SQL text otherwise).
    pub record_sql_bindings: bool,
    /// Record host log messages.
    pub record_logs: bool,
    /// Record queue jobs and CLI commands.
    pub record_queue_info: bool,
}

impl Default for RecorderFlags {
    fn default() -> Self {
        Self {
            record_sql_queries: true,
            record_sql_bindings: true,
            record_logs: true,
            record_queue_info: true,
        }
    }
}

impl RecorderFlags {
    /// Parses flags from a host options object.
    ///
    /// Missing keys keep their default, unknown keys are ignored.
    ///
    /// # Errors
    /// - [`ConfigError::NotAnObject`] if `options` is not a JSON object;
    /// - [`ConfigError::Invalid`] if a recognized key is not a boolean.
    pub fn from_options(options: &Value) -> Result<Self, ConfigError> {
        if !options.is_object() {
            return Err(ConfigError::NotAnObject(json_type(options)));
        }
        Ok(Self::deserialize(options)?)
    }

    /// Returns flags with every recorder disabled.
    pub fn none() -> Self {
        Self {
            record_sql_queries: false,
            record_sql_bindings: false,
            record_logs: false,
            record_queue_info: false,
        }
    }
}

/// Settings for one collector instance.
///
/// ## Field semantics
/// - `flags`: recorder switches, see [`RecorderFlags`]
/// - `store_capacity`: ring-buffer bound for the store (`0` = unbounded)
/// - `diagnostic_capacity`: diagnostic bus ring size (min 1; clamped)
/// - `flush_queue_capacity`: pending flush requests before new ones are dropped (min 1; clamped)
#[derive(Clone, Debug)]
pub struct Config {
    pub flags: RecorderFlags,

    /// Maximum number of breadcrumbs retained.
    ///
    /// When the bound is reached the oldest breadcrumb is evicted.
    pub store_capacity: usize,

    pub diagnostic_capacity: usize,

    pub flush_queue_capacity: usize,
}

impl Config {
    /// Returns the store bound as an `Option`.
    ///
    /// - `None` → unbounded
    /// - `Some(n)` → at most `n` breadcrumbs retained
    #[inline]
    pub fn store_bound(&self) -> Option<usize> {
        match self.store_capacity {
            0 => None,
            n => Some(n),
        }
    }

    /// Returns the diagnostic bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn diagnostic_capacity_clamped(&self) -> usize {
        self.diagnostic_capacity.max(1)
    }

    /// Returns the flush queue capacity clamped to a minimum of 1.
    #[inline]
    pub fn flush_queue_clamped(&self) -> usize {
        self.flush_queue_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `flags = RecorderFlags::default()` (everything recorded)
    /// - `store_capacity = 0` (unbounded)
    /// - `diagnostic_capacity = 256`
    /// - `flush_queue_capacity = 16`
    fn default() -> Self {
        Self {
            flags: RecorderFlags::default(),
            store_capacity: 0,
            diagnostic_capacity: 256,
            flush_queue_capacity: 16,
        }
    }
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flags_default_to_enabled() {
        let flags = RecorderFlags::from_options(&json!({})).unwrap();
        assert_eq!(flags, RecorderFlags::default());
        assert!(flags.record_sql_queries && flags.record_sql_bindings);
        assert!(flags.record_logs && flags.record_queue_info);
    }

    #[test]
    fn test_flags_read_camel_case_keys() {
        let flags = RecorderFlags::from_options(&json!({
            "recordSqlQueries": false,
            "recordSqlBindings": false,
            "recordLogs": true,
            "recordQueueInfo": false,
            "somethingElse": 42,
        }))
        .unwrap();

        assert!(!flags.record_sql_queries);
        assert!(!flags.record_sql_bindings);
        assert!(flags.record_logs);
        assert!(!flags.record_queue_info);
    }

    #[test]
    fn test_flags_reject_non_object() {
        let err = RecorderFlags::from_options(&json!([true])).unwrap_err();
        assert_eq!(err.as_label(), "config_not_an_object");
    }

    #[test]
    fn test_flags_reject_wrong_type() {
        let err = RecorderFlags::from_options(&json!({ "recordLogs": "yes" })).unwrap_err();
        assert_eq!(err.as_label(), "config_invalid");
    }

    #[test]
    fn test_sentinels() {
        let mut cfg = Config::default();
        assert_eq!(cfg.store_bound(), None);
        cfg.store_capacity = 50;
        assert_eq!(cfg.store_bound(), Some(50));

        cfg.diagnostic_capacity = 0;
        cfg.flush_queue_capacity = 0;
        assert_eq!(cfg.diagnostic_capacity_clamped(), 1);
        assert_eq!(cfg.flush_queue_clamped(), 1);
    }
}
