//! # Log-driver handler.
//!
//! [`ChannelHandler`] is what the host's log-channel factory receives when it
//! resolves the `telelogger` driver: records at or above the configured level are
//! forwarded to a [`RecordSink`]; `bubble` decides whether the host keeps passing
//! them to the next handler in its stack.
//!
//! ## Example
//! ```rust
//! use telelogger::channel::{ChannelConfig, ChannelHandler, LogRecord};
//! use telelogger::Level;
//!
//! let cfg = ChannelConfig::from_options(&serde_json::json!({
//!     "level": "WARNING",
//!     "bubble": false,
//! })).unwrap();
//! let handler = ChannelHandler::discarding(&cfg);
//!
//! assert!(!handler.handle(&LogRecord::new("app", Level::Info, "ignored")));
//! assert!(handler.handle(&LogRecord::new("app", Level::Error, "kept, not bubbled")));
//! ```

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::breadcrumbs::Level;
use crate::config::json_type;
use crate::error::ConfigError;

use super::{DiscardSink, LogRecord, RecordSink};

/// Options of the `telelogger` log channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Channel name; the host's default channel name when absent.
    pub name: Option<String>,
    /// Minimum level handled.
    #[serde(deserialize_with = "level_name")]
    pub level: Level,
    /// Let handled records continue to the next handler.
    pub bubble: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            name: None,
            level: Level::Debug,
            bubble: true,
        }
    }
}

impl ChannelConfig {
    /// Parses channel options; missing keys keep their default.
    ///
    /// # Errors
    /// - [`ConfigError::NotAnObject`] if `options` is not a JSON object;
    /// - [`ConfigError::Invalid`] for an unknown level name or a mistyped key.
    pub fn from_options(options: &Value) -> Result<Self, ConfigError> {
        if !options.is_object() {
            return Err(ConfigError::NotAnObject(json_type(options)));
        }
        Ok(Self::deserialize(options)?)
    }
}

fn level_name<'de, D: Deserializer<'de>>(de: D) -> Result<Level, D::Error> {
    let name = String::deserialize(de)?;
    name.parse().map_err(serde::de::Error::custom)
}

/// Handler installed in the host's log stack.
#[derive(Clone)]
pub struct ChannelHandler {
    level: Level,
    bubble: bool,
    sink: Arc<dyn RecordSink>,
}

impl ChannelHandler {
    pub fn new(cfg: &ChannelConfig, sink: Arc<dyn RecordSink>) -> Self {
        Self {
            level: cfg.level,
            bubble: cfg.bubble,
            sink,
        }
    }

    /// Handler backed by [`DiscardSink`].
    pub fn discarding(cfg: &ChannelConfig) -> Self {
        Self::new(cfg, Arc::new(DiscardSink))
    }

    /// Returns `true` if a record at `level` would be handled.
    #[inline]
    pub fn handles(&self, level: Level) -> bool {
        level >= self.level
    }

    /// Forwards `record` to the sink if its level qualifies.
    ///
    /// Returns `true` when the record was handled and must not bubble further.
    pub fn handle(&self, record: &LogRecord) -> bool {
        if !self.handles(record.level) {
            return false;
        }
        self.sink.write(record);
        !self.bubble
    }

    /// Forwards the qualifying records of `records` as one batch, in order.
    pub fn handle_batch(&self, records: &[LogRecord]) {
        let accepted: Vec<LogRecord> = records
            .iter()
            .filter(|r| self.handles(r.level))
            .cloned()
            .collect();
        if !accepted.is_empty() {
            self.sink.write_batch(&accepted);
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn bubble(&self) -> bool {
        self.bubble
    }
}

impl std::fmt::Debug for ChannelHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelHandler")
            .field("level", &self.level)
            .field("bubble", &self.bubble)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collecting {
        single: Mutex<Vec<String>>,
        batches: Mutex<Vec<Vec<String>>>,
    }

    impl RecordSink for Collecting {
        fn write(&self, record: &LogRecord) {
            self.single.lock().unwrap().push(record.message.clone());
        }

        fn write_batch(&self, records: &[LogRecord]) {
            self.batches
                .lock()
                .unwrap()
                .push(records.iter().map(|r| r.message.clone()).collect());
        }
    }

    #[test]
    fn test_defaults() {
        let cfg = ChannelConfig::from_options(&json!({})).unwrap();
        assert_eq!(cfg, ChannelConfig::default());
        assert_eq!(cfg.level, Level::Debug);
        assert!(cfg.bubble);
    }

    #[test]
    fn test_rejects_bad_options() {
        assert!(matches!(
            ChannelConfig::from_options(&json!("debug")),
            Err(ConfigError::NotAnObject("string"))
        ));
        assert!(matches!(
            ChannelConfig::from_options(&json!({"level": "loud"})),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_level_threshold_and_bubbling() {
        let sink = Arc::new(Collecting::default());
        let cfg = ChannelConfig {
            level: Level::Notice,
            ..ChannelConfig::default()
        };
        let handler = ChannelHandler::new(&cfg, sink.clone());

        assert!(!handler.handle(&LogRecord::new("app", Level::Info, "quiet")));
        // bubbling: handled but not consumed
        assert!(!handler.handle(&LogRecord::new("app", Level::Alert, "loud")));
        assert_eq!(*sink.single.lock().unwrap(), vec!["loud".to_string()]);
    }

    #[test]
    fn test_accepted_record_reaches_sink_intact() {
        #[derive(Default)]
        struct Keeping(Mutex<Vec<LogRecord>>);

        impl RecordSink for Keeping {
            fn write(&self, record: &LogRecord) {
                self.0.lock().unwrap().push(record.clone());
            }
        }

        let sink = Arc::new(Keeping::default());
        let handler = ChannelHandler::new(&ChannelConfig::default(), sink.clone());
        let record = LogRecord::new("app", Level::Error, "payment failed")
            .with_context("order", 42)
            .with_formatted("[app] ERROR: payment failed");
        handler.handle(&record);

        let kept = sink.0.lock().unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].context["order"], 42);
        assert_eq!(kept[0].formatted.as_deref(), Some("[app] ERROR: payment failed"));
    }

    #[test]
    fn test_batch_keeps_order_of_qualifying_records() {
        let sink = Arc::new(Collecting::default());
        let cfg = ChannelConfig {
            level: Level::Warning,
            ..ChannelConfig::default()
        };
        let handler = ChannelHandler::new(&cfg, sink.clone());

        handler.handle_batch(&[
            LogRecord::new("app", Level::Error, "a"),
            LogRecord::new("app", Level::Debug, "b"),
            LogRecord::new("app", Level::Warning, "c"),
        ]);
        handler.handle_batch(&[LogRecord::new("app", Level::Debug, "d")]);

        assert_eq!(
            *sink.batches.lock().unwrap(),
            vec![vec!["a".to_string(), "c".to_string()]]
        );
    }
}
