//! jrtest-logging - Tracing bridge to the host logger
//!
//! This crate provides:
//! - [`HostLoggingLayer`] tracing layer that forwards events to a [`HostLogSink`]
//! - [`LogSinkManager`] holding the installed sink and the active level
//! - [`ReloadHandle`] for changing the level at runtime
//! - [`init_console_logging`] for the command-line tool
//!
//! Events keep their message template and structured fields apart; the sink
//! receives both and decides how to render them.

mod layer;
mod reload;
mod sink;

pub use jrtest_core::LogLevel;
pub use layer::{HostLoggingLayer, init_console_logging, init_logging};
pub use reload::ReloadHandle;
pub use sink::{CapturedRecord, HostLogSink, LogSinkManager, MemorySink};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{HostLogSink, HostLoggingLayer, LogLevel, LogSinkManager, init_logging};
}
