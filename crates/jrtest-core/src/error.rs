//! Error taxonomy for jrtest operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Stable identifier carried by not-found faults so hosts can recognise them
/// across process and namespace boundaries.
pub const NOT_FOUND_TYPE_IDENTIFIER: uuid::Uuid =
    uuid::uuid!("0a3feb05-9ddb-42ba-983a-b60763df0199");

/// Diagnostic payload attached to a not-found fault
///
/// Only surfaced to callers when the module runs in diagnostic mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultSafeInfo {
    /// Free-text note, e.g. `"Workspace 1015024"`
    pub information: String,
    /// When the fault was raised
    pub time: DateTime<Utc>,
}

impl FaultSafeInfo {
    pub fn new(information: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            information: information.into(),
            time,
        }
    }
}

/// Error type for service operations
#[derive(Error, Debug, Clone)]
pub enum ServiceError {
    /// Caller input failed a precondition
    #[error("validation failed: {0}")]
    Validation(String),

    /// Target entity does not exist
    #[error("{message}")]
    NotFound {
        message: String,
        fault: Option<FaultSafeInfo>,
    },

    /// A downstream capability is not installed
    #[error("capability not installed: {capability}")]
    DependencyUnavailable { capability: String },

    /// A downstream capability is present but the call failed
    #[error("operation failed: {0}")]
    OperationFailed(String),

    /// Database query failed
    #[error("query failed: {0}")]
    Query(String),

    /// A value returned by a collaborator could not be interpreted
    #[error("parse error: {0}")]
    Parse(String),

    /// Payload could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),

    /// No handler is registered for the route tag
    #[error("unknown route: {0}")]
    UnknownRoute(String),

    /// Module is not in a valid state for the requested operation
    #[error("invalid module state: expected {expected}, got {actual}")]
    InvalidState { expected: String, actual: String },

    /// Concurrency limit reached
    #[error("too many concurrent requests")]
    TooManyRequests,

    /// Request was cancelled
    #[error("request cancelled")]
    Cancelled,

    /// Request timed out
    #[error("request timed out")]
    Timeout,

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Async runtime error
    #[error("runtime error: {0}")]
    Runtime(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Not-found error without diagnostic payload
    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound {
            message: message.into(),
            fault: None,
        }
    }

    /// Not-found error carrying a fault-safe diagnostic payload
    pub fn not_found_with(message: impl Into<String>, fault: FaultSafeInfo) -> Self {
        ServiceError::NotFound {
            message: message.into(),
            fault: Some(fault),
        }
    }

    pub fn dependency_unavailable(capability: impl Into<String>) -> Self {
        ServiceError::DependencyUnavailable {
            capability: capability.into(),
        }
    }

    /// Returns a stable numeric code for the variant
    pub fn error_code(&self) -> u32 {
        match self {
            ServiceError::Validation(_) => 1,
            ServiceError::NotFound { .. } => 2,
            ServiceError::DependencyUnavailable { .. } => 3,
            ServiceError::OperationFailed(_) => 4,
            ServiceError::Query(_) => 5,
            ServiceError::Parse(_) => 6,
            ServiceError::Serialization(_) => 7,
            ServiceError::UnknownRoute(_) => 8,
            ServiceError::InvalidState { .. } => 9,
            ServiceError::TooManyRequests => 10,
            ServiceError::Cancelled => 11,
            ServiceError::Timeout => 12,
            ServiceError::Config(_) => 13,
            ServiceError::Runtime(_) => 14,
            ServiceError::Internal(_) => 15,
        }
    }

    /// Rebuild an error from a code and message (inverse of [`error_code`](Self::error_code))
    pub fn from_code(code: u32, message: String) -> Self {
        match code {
            1 => ServiceError::Validation(message),
            2 => ServiceError::not_found(message),
            3 => ServiceError::DependencyUnavailable {
                capability: message,
            },
            4 => ServiceError::OperationFailed(message),
            5 => ServiceError::Query(message),
            6 => ServiceError::Parse(message),
            7 => ServiceError::Serialization(message),
            8 => ServiceError::UnknownRoute(message),
            9 => ServiceError::InvalidState {
                expected: String::new(),
                actual: message,
            },
            10 => ServiceError::TooManyRequests,
            11 => ServiceError::Cancelled,
            12 => ServiceError::Timeout,
            13 => ServiceError::Config(message),
            14 => ServiceError::Runtime(message),
            _ => ServiceError::Internal(message),
        }
    }

    /// HTTP-style status associated with the failure
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) | ServiceError::Serialization(_) => 400,
            ServiceError::NotFound { .. }
            | ServiceError::DependencyUnavailable { .. }
            | ServiceError::UnknownRoute(_) => 404,
            ServiceError::TooManyRequests => 429,
            ServiceError::Cancelled => 499,
            ServiceError::InvalidState { .. } => 503,
            ServiceError::Timeout => 504,
            ServiceError::OperationFailed(_)
            | ServiceError::Query(_)
            | ServiceError::Parse(_)
            | ServiceError::Config(_)
            | ServiceError::Runtime(_)
            | ServiceError::Internal(_) => 500,
        }
    }

    /// Short variant name recorded in [`ErrorInfo`](crate::ErrorInfo)
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "Validation",
            ServiceError::NotFound { .. } => "NotFound",
            ServiceError::DependencyUnavailable { .. } => "DependencyUnavailable",
            ServiceError::OperationFailed(_) => "OperationFailed",
            ServiceError::Query(_) => "Query",
            ServiceError::Parse(_) => "Parse",
            ServiceError::Serialization(_) => "Serialization",
            ServiceError::UnknownRoute(_) => "UnknownRoute",
            ServiceError::InvalidState { .. } => "InvalidState",
            ServiceError::TooManyRequests => "TooManyRequests",
            ServiceError::Cancelled => "Cancelled",
            ServiceError::Timeout => "Timeout",
            ServiceError::Config(_) => "Config",
            ServiceError::Runtime(_) => "Runtime",
            ServiceError::Internal(_) => "Internal",
        }
    }

    /// Whether the request was interrupted rather than failing; such errors
    /// always reach the caller instead of being folded into an envelope
    pub fn interrupts(&self) -> bool {
        matches!(self, ServiceError::Cancelled | ServiceError::Timeout)
    }

    /// Type identifier for cross-boundary identification, if the variant has one
    pub fn type_identifier(&self) -> Option<uuid::Uuid> {
        match self {
            ServiceError::NotFound { .. } => Some(NOT_FOUND_TYPE_IDENTIFIER),
            _ => None,
        }
    }

    /// Diagnostic payload, if any
    pub fn fault_safe(&self) -> Option<&FaultSafeInfo> {
        match self {
            ServiceError::NotFound { fault, .. } => fault.as_ref(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Serialization(err.to_string())
    }
}
