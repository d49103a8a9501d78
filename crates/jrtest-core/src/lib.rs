//! jrtest-core - Result envelope, error taxonomy, and module lifecycle
//!
//! This crate provides the foundational types shared by every jrtest crate:
//! - [`ResultEnvelope`] uniform wrapper returned by every operation
//! - [`ServiceError`] typed failures and their status/class mapping
//! - [`ServiceModule`] trait implemented by the service
//! - [`ServiceConfig`] module configuration
//! - [`CancelHandle`] / [`CancelSignal`] for cancellation propagation

mod cancel;
mod clock;
mod config;
mod envelope;
mod error;
mod lifecycle;
mod request;
mod service;

pub use cancel::{CancelHandle, CancelSignal, run_cancellable};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{PivotSettings, ReviewerSettings, SearchSettings, ServiceConfig, ServiceMetadata};
pub use envelope::{ErrorInfo, FailureClass, ResultEnvelope, SERVICE_NOT_INSTALLED};
pub use error::{FaultSafeInfo, NOT_FOUND_TYPE_IDENTIFIER, ServiceError, ServiceResult};
pub use lifecycle::ModuleState;
pub use request::{ExecutionIdentity, RequestContext, WorkspaceId};
pub use service::{ServiceContext, ServiceModule};

/// Log levels understood by the host logger
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Off = 5,
}

impl LogLevel {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Trace,
            1 => LogLevel::Debug,
            2 => LogLevel::Info,
            3 => LogLevel::Warn,
            4 => LogLevel::Error,
            _ => LogLevel::Off,
        }
    }

    /// Parse a configuration string such as `"debug"` (case-insensitive)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            "off" | "none" => Some(LogLevel::Off),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Off => write!(f, "OFF"),
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CancelSignal, ExecutionIdentity, LogLevel, ModuleState, RequestContext, ResultEnvelope,
        ServiceConfig, ServiceContext, ServiceError, ServiceModule, ServiceResult, WorkspaceId,
    };
}

#[cfg(test)]
mod lib_tests;
