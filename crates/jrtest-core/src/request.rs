//! Per-request context passed to every operation

use crate::cancel::CancelSignal;
use serde::{Deserialize, Serialize};

/// Workspace (case) artifact id; `-1` addresses the admin database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceId(pub i32);

impl WorkspaceId {
    /// Instance-level admin scope
    pub const ADMIN: WorkspaceId = WorkspaceId(-1);

    pub fn get(self) -> i32 {
        self.0
    }

    pub fn is_admin(self) -> bool {
        self == Self::ADMIN
    }
}

impl std::fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for WorkspaceId {
    fn from(value: i32) -> Self {
        WorkspaceId(value)
    }
}

/// Identity under which a downstream capability is acquired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionIdentity {
    /// The authenticated caller
    CurrentUser,
    /// The service account
    #[default]
    System,
}

/// Context for an incoming request
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique request ID assigned by the host
    pub request_id: u64,
    /// Route tag, e.g. `"workspace.get"`
    pub route: String,
    /// Optional correlation ID for tracking across systems
    pub correlation_id: Option<String>,
    /// Identity of the caller on whose behalf the request runs
    pub identity: ExecutionIdentity,
    /// Fires when the caller abandons the request or the host shuts down
    pub cancel: CancelSignal,
}

impl RequestContext {
    pub fn new(request_id: u64, route: impl Into<String>) -> Self {
        Self {
            request_id,
            route: route.into(),
            correlation_id: None,
            identity: ExecutionIdentity::CurrentUser,
            cancel: CancelSignal::never(),
        }
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    pub fn with_identity(mut self, identity: ExecutionIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }
}

#[cfg(test)]
#[path = "request/request_tests.rs"]
mod request_tests;
