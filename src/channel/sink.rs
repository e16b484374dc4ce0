//! Log records and the sinks that receive them.

use std::time::SystemTime;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::breadcrumbs::Level;

/// One already-formatted host log record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    pub at: SystemTime,
    pub channel: String,
    pub level: Level,
    pub message: String,
    pub context: Map<String, Value>,
    /// Output of the host formatter, when one ran.
    pub formatted: Option<String>,
}

impl LogRecord {
    pub fn new(channel: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        Self {
            at: SystemTime::now(),
            channel: channel.into(),
            level,
            message: message.into(),
            context: Map::new(),
            formatted: None,
        }
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn with_formatted(mut self, formatted: impl Into<String>) -> Self {
        self.formatted = Some(formatted.into());
        self
    }
}

/// Destination for log records accepted by a [`ChannelHandler`](super::ChannelHandler).
///
/// Implementations must not block on I/O; queue the records and ship them elsewhere.
pub trait RecordSink: Send + Sync {
    fn write(&self, record: &LogRecord);

    /// Writes a batch in order. The default writes one record at a time.
    fn write_batch(&self, records: &[LogRecord]) {
        for record in records {
            self.write(record);
        }
    }
}

/// Sink that accepts and discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl RecordSink for DiscardSink {
    fn write(&self, _record: &LogRecord) {}

    fn write_batch(&self, _records: &[LogRecord]) {}
}
