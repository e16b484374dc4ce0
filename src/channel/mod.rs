//! Log-channel driver.
//!
//! Hosts that route their own logging through named drivers register
//! [`DRIVER_NAME`] and build a [`ChannelHandler`] from the channel's options.
//! Accepted records go to a [`RecordSink`]; the default [`DiscardSink`] drops them
//! until an integrator installs a real one.

mod handler;
mod sink;

pub use handler::{ChannelConfig, ChannelHandler};
pub use sink::{DiscardSink, LogRecord, RecordSink};

/// Name under which the log driver is registered with the host.
pub const DRIVER_NAME: &str = "telelogger";
