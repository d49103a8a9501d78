//! Uniform result envelope and failure classification
//!
//! Every externally callable operation answers with a [`ResultEnvelope`].
//! Failures caught at the operation boundary are classified with
//! [`FailureClass`]:
//!
//! | class                | succeeded | status | message                   |
//! |----------------------|-----------|--------|---------------------------|
//! | `DependencyNotFound` | `true`    | 404    | [`SERVICE_NOT_INSTALLED`] |
//! | `OperationFailure`   | `false`   | 500    | operation sentinel        |
//! | `Validation`         | n/a       | 400    | raised, never wrapped     |
//!
//! A dependency that is not installed is a *soft failure*: the envelope says
//! `succeeded = true` but carries a 404 status and the captured error.

use crate::error::{ServiceError, ServiceResult};
use serde::{Deserialize, Serialize};

/// Message used for soft failures caused by a missing capability
pub const SERVICE_NOT_INSTALLED: &str = "ServiceNotInstalled";

/// Captured failure detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error kind, e.g. `"DependencyUnavailable"`
    pub kind: String,
    /// Original error message
    pub message: String,
}

impl ErrorInfo {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl From<&ServiceError> for ErrorInfo {
    fn from(err: &ServiceError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

/// Failure classes of the envelope protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Downstream capability not installed (soft failure)
    DependencyNotFound,
    /// Anything else that broke inside the operation body
    OperationFailure,
    /// Bad caller input, raised before any envelope exists
    Validation,
}

impl FailureClass {
    /// Classify an error
    pub fn of(err: &ServiceError) -> Self {
        match err {
            ServiceError::Validation(_) | ServiceError::Serialization(_) => {
                FailureClass::Validation
            }
            ServiceError::DependencyUnavailable { .. } => FailureClass::DependencyNotFound,
            _ => FailureClass::OperationFailure,
        }
    }

    pub fn status_code(self) -> u16 {
        match self {
            FailureClass::DependencyNotFound => 404,
            FailureClass::OperationFailure => 500,
            FailureClass::Validation => 400,
        }
    }

    /// Value of `succeeded` for envelopes of this class
    pub fn succeeded(self) -> bool {
        matches!(self, FailureClass::DependencyNotFound)
    }
}

/// Uniform wrapper around an operation's result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope<T> {
    payload: T,
    succeeded: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<ErrorInfo>,
    status_code: u16,
}

impl<T> ResultEnvelope<T> {
    /// Successful envelope with status 200
    pub fn ok(payload: T) -> Self {
        Self {
            payload,
            succeeded: true,
            message: None,
            error: None,
            status_code: 200,
        }
    }

    /// Soft failure: the capability is not installed
    pub fn dependency_unavailable(payload: T, err: &ServiceError) -> Self {
        Self {
            payload,
            succeeded: true,
            message: Some(SERVICE_NOT_INSTALLED.to_string()),
            error: Some(err.into()),
            status_code: FailureClass::DependencyNotFound.status_code(),
        }
    }

    /// Hard failure of the operation body
    pub fn operation_failed(payload: T, sentinel: impl Into<String>, err: &ServiceError) -> Self {
        Self {
            payload,
            succeeded: false,
            message: Some(sentinel.into()),
            error: Some(err.into()),
            status_code: FailureClass::OperationFailure.status_code(),
        }
    }

    /// Replace the message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn into_payload(self) -> T {
        self.payload
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        self.error.as_ref()
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// `succeeded` but with a captured error, i.e. a missing dependency
    pub fn is_soft_failure(&self) -> bool {
        self.succeeded && self.error.is_some()
    }

    /// Holds when a failed envelope carries a 4xx/5xx status
    pub fn is_consistent(&self) -> bool {
        self.succeeded || self.status_code >= 400
    }

    /// Transform the payload, keeping every other field
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResultEnvelope<U> {
        ResultEnvelope {
            payload: f(self.payload),
            succeeded: self.succeeded,
            message: self.message,
            error: self.error,
            status_code: self.status_code,
        }
    }
}

impl<T: Default> ResultEnvelope<T> {
    /// Fold an operation outcome into an envelope.
    ///
    /// Only cancellation and timeouts are returned as `Err`. A missing
    /// capability becomes a soft failure; any other error raised inside the
    /// operation body, typed collaborator errors included, becomes an
    /// operation failure carrying `sentinel` as its message.
    pub fn capture(result: ServiceResult<T>, sentinel: &str) -> ServiceResult<Self> {
        match result {
            Ok(payload) => Ok(Self::ok(payload)),
            Err(err) if err.interrupts() => Err(err),
            Err(err) => Ok(match FailureClass::of(&err) {
                FailureClass::DependencyNotFound => {
                    Self::dependency_unavailable(T::default(), &err)
                }
                _ => Self::operation_failed(T::default(), sentinel, &err),
            }),
        }
    }

    /// Like [`capture`](Self::capture) but a missing capability is also an
    /// operation failure.
    pub fn capture_collapsed(result: ServiceResult<T>, sentinel: &str) -> ServiceResult<Self> {
        match result {
            Ok(payload) => Ok(Self::ok(payload)),
            Err(err) if err.interrupts() => Err(err),
            Err(err) => Ok(Self::operation_failed(T::default(), sentinel, &err)),
        }
    }
}

impl<T: Default> Default for ResultEnvelope<T> {
    fn default() -> Self {
        Self::ok(T::default())
    }
}
