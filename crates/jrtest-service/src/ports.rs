//! Collaborator ports: the database executor and platform service proxies

use crate::models::{
    ApplicationInfo, AuditQueryRequest, MetricRecord, PivotQuery, QueryResultSlim,
    ReviewerChoicesCriteria, ReviewerStats, ReviewerStatsRequest,
};
use async_trait::async_trait;
use jrtest_core::{CancelSignal, ExecutionIdentity, ServiceResult, WorkspaceId};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;

/// A bound parameter or result cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SqlValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Int(v) => Some(*v),
            SqlValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(value.into())
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

pub type Row = Vec<SqlValue>;

/// A parameterized statement
///
/// `label` names the statement for logs and lets in-memory executors
/// recognise it without parsing SQL.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub label: &'static str,
    pub statement: &'static str,
    pub parameters: Vec<(&'static str, SqlValue)>,
}

impl SqlQuery {
    pub fn new(label: &'static str, statement: &'static str) -> Self {
        Self {
            label,
            statement,
            parameters: Vec::new(),
        }
    }

    pub fn bind(mut self, name: &'static str, value: impl Into<SqlValue>) -> Self {
        self.parameters.push((name, value.into()));
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&SqlValue> {
        self.parameters
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

/// Runs statements against the database of one workspace
///
/// `scope` [`WorkspaceId::ADMIN`] addresses the instance database.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// First column of the first row, `None` when there are no rows
    async fn execute_scalar(
        &self,
        scope: WorkspaceId,
        query: &SqlQuery,
        cancel: &CancelSignal,
    ) -> ServiceResult<Option<SqlValue>>;

    async fn execute_rows(
        &self,
        scope: WorkspaceId,
        query: &SqlQuery,
        cancel: &CancelSignal,
    ) -> ServiceResult<Vec<Row>>;
}

/// A remote platform service reachable through a [`Proxy`]
pub trait Capability: Send + Sync {
    fn name(&self) -> &'static str;

    /// Called exactly once when the owning proxy goes out of scope
    fn release(&self) {}
}

/// Scoped handle to a capability; released on drop
pub struct Proxy<C: ?Sized + Capability> {
    inner: Arc<C>,
    identity: ExecutionIdentity,
}

impl<C: ?Sized + Capability> Proxy<C> {
    pub fn new(inner: Arc<C>, identity: ExecutionIdentity) -> Self {
        tracing::trace!(capability = inner.name(), identity = ?identity, "Proxy acquired");
        Self { inner, identity }
    }

    pub fn identity(&self) -> ExecutionIdentity {
        self.identity
    }
}

impl<C: ?Sized + Capability> Deref for Proxy<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.inner
    }
}

impl<C: ?Sized + Capability> Drop for Proxy<C> {
    fn drop(&mut self) {
        self.inner.release();
        tracing::trace!(capability = self.inner.name(), "Proxy released");
    }
}

#[async_trait]
pub trait LibraryApplicationManager: Capability {
    async fn read_all(
        &self,
        scope: WorkspaceId,
        cancel: &CancelSignal,
    ) -> ServiceResult<Vec<ApplicationInfo>>;
}

#[async_trait]
pub trait AuditMetricsService: Capability {
    async fn workspace_audit_metrics(
        &self,
        scope: WorkspaceId,
        cancel: &CancelSignal,
    ) -> ServiceResult<MetricRecord>;
}

#[async_trait]
pub trait AuditObjectManager: Capability {
    async fn query_slim(
        &self,
        scope: WorkspaceId,
        request: &AuditQueryRequest,
        start: usize,
        length: usize,
        cancel: &CancelSignal,
    ) -> ServiceResult<QueryResultSlim>;
}

#[async_trait]
pub trait ReviewerStatisticsService: Capability {
    async fn reviewer_stats(
        &self,
        scope: WorkspaceId,
        request: &ReviewerStatsRequest,
        cancel: &CancelSignal,
    ) -> ServiceResult<Vec<ReviewerStats>>;

    async fn reviewer_choices(
        &self,
        scope: WorkspaceId,
        criteria: &ReviewerChoicesCriteria,
        cancel: &CancelSignal,
    ) -> ServiceResult<serde_json::Value>;
}

#[async_trait]
pub trait AuditPivotService: Capability {
    async fn pivot(
        &self,
        scope: WorkspaceId,
        query: &PivotQuery,
        cancel: &CancelSignal,
    ) -> ServiceResult<serde_json::Value>;
}

/// Creates capability proxies under an execution identity
///
/// A capability that is not installed yields
/// [`ServiceError::DependencyUnavailable`](jrtest_core::ServiceError::DependencyUnavailable).
pub trait ProxyFactory: Send + Sync {
    fn library_applications(
        &self,
        identity: ExecutionIdentity,
    ) -> ServiceResult<Proxy<dyn LibraryApplicationManager>>;

    fn audit_metrics(
        &self,
        identity: ExecutionIdentity,
    ) -> ServiceResult<Proxy<dyn AuditMetricsService>>;

    fn audit_object_manager(
        &self,
        identity: ExecutionIdentity,
    ) -> ServiceResult<Proxy<dyn AuditObjectManager>>;

    fn reviewer_statistics(
        &self,
        identity: ExecutionIdentity,
    ) -> ServiceResult<Proxy<dyn ReviewerStatisticsService>>;

    fn audit_pivot(
        &self,
        identity: ExecutionIdentity,
    ) -> ServiceResult<Proxy<dyn AuditPivotService>>;
}
