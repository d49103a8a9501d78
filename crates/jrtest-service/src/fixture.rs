//! In-memory backend implementing the collaborator ports
//!
//! Loaded from JSON or TOML. Capabilities can be marked missing (proxy
//! creation fails with `DependencyUnavailable`) or failing (every call
//! returns `OperationFailed`). Proxy acquisition and release are counted.

use crate::models::{
    ApplicationInfo, AuditQueryRequest, MetricRecord, ObjectSlim, PivotQuery, QueryResultSlim,
    ReviewerChoicesCriteria, ReviewerStats, ReviewerStatsRequest, SortDirection,
};
use crate::ports::{
    AuditMetricsService, AuditObjectManager, AuditPivotService, Capability,
    LibraryApplicationManager, Proxy, ProxyFactory, QueryExecutor, ReviewerStatisticsService, Row,
    SqlQuery, SqlValue,
};
use crate::workspace::{WORKSPACE_NAME_QUERY, WORKSPACE_SEARCH_QUERY};
use async_trait::async_trait;
use jrtest_core::{CancelSignal, ExecutionIdentity, ServiceError, ServiceResult, WorkspaceId};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Platform services a proxy can be created for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    LibraryApplications,
    AuditMetrics,
    AuditObjectManager,
    ReviewerStatistics,
    AuditPivot,
}

impl CapabilityKind {
    pub fn name(self) -> &'static str {
        match self {
            CapabilityKind::LibraryApplications => "LibraryApplicationManager",
            CapabilityKind::AuditMetrics => "AuditMetricsService",
            CapabilityKind::AuditObjectManager => "AuditObjectManager",
            CapabilityKind::ReviewerStatistics => "ReviewerStatisticsService",
            CapabilityKind::AuditPivot => "AuditPivotService",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceFixture {
    pub id: i32,
    pub name: String,
}

/// One audit record; `audit_id` is in the composite `{workspace}-{id}` form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditFixture {
    pub workspace_id: i32,
    pub audit_id: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewerStatsFixture {
    pub workspace_id: i32,
    pub stats: Vec<ReviewerStats>,
}

/// Backend contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureData {
    #[serde(default)]
    pub workspaces: Vec<WorkspaceFixture>,

    #[serde(default)]
    pub applications: Vec<ApplicationInfo>,

    #[serde(default)]
    pub metrics: Vec<MetricRecord>,

    #[serde(default)]
    pub audits: Vec<AuditFixture>,

    #[serde(default)]
    pub reviewer_stats: Vec<ReviewerStatsFixture>,

    #[serde(default)]
    pub reviewer_choices: Option<serde_json::Value>,

    #[serde(default)]
    pub pivot: Option<serde_json::Value>,

    /// Capabilities that are not installed
    #[serde(default)]
    pub missing: Vec<CapabilityKind>,

    /// Capabilities whose calls fail
    #[serde(default)]
    pub failing: Vec<CapabilityKind>,

    /// Workspaces whose database queries fail
    #[serde(default)]
    pub failing_databases: Vec<i32>,
}

impl FixtureData {
    pub fn from_json(data: &str) -> ServiceResult<Self> {
        Ok(serde_json::from_str(data)?)
    }

    fn workspace_name(&self, id: i32) -> Option<&str> {
        self.workspaces
            .iter()
            .find(|ws| ws.id == id)
            .map(|ws| ws.name.as_str())
    }
}

#[derive(Debug, Default)]
struct Counters {
    acquired: AtomicUsize,
    released: AtomicUsize,
    queries: AtomicUsize,
    identities: Mutex<Vec<(CapabilityKind, ExecutionIdentity)>>,
    stats_requests: Mutex<Vec<ReviewerStatsRequest>>,
}

/// In-memory [`QueryExecutor`] and [`ProxyFactory`]
pub struct FixtureBackend {
    data: Arc<FixtureData>,
    counters: Arc<Counters>,
}

impl FixtureBackend {
    pub fn new(data: FixtureData) -> Self {
        Self {
            data: Arc::new(data),
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn data(&self) -> &FixtureData {
        &self.data
    }

    /// Proxies created so far
    pub fn acquired(&self) -> usize {
        self.counters.acquired.load(Ordering::SeqCst)
    }

    /// Proxies released so far
    pub fn released(&self) -> usize {
        self.counters.released.load(Ordering::SeqCst)
    }

    /// Statements executed so far
    pub fn query_count(&self) -> usize {
        self.counters.queries.load(Ordering::SeqCst)
    }

    /// Identity used for each proxy, in creation order
    pub fn identities(&self) -> Vec<(CapabilityKind, ExecutionIdentity)> {
        self.counters.identities.lock().clone()
    }

    /// Reviewer statistics windows requested so far
    pub fn stats_requests(&self) -> Vec<ReviewerStatsRequest> {
        self.counters.stats_requests.lock().clone()
    }

    fn capability(
        &self,
        kind: CapabilityKind,
        identity: ExecutionIdentity,
    ) -> ServiceResult<Arc<FixtureCapability>> {
        if self.data.missing.contains(&kind) {
            return Err(ServiceError::dependency_unavailable(kind.name()));
        }
        self.counters.acquired.fetch_add(1, Ordering::SeqCst);
        self.counters.identities.lock().push((kind, identity));
        Ok(Arc::new(FixtureCapability {
            kind,
            data: self.data.clone(),
            counters: self.counters.clone(),
        }))
    }

    fn database(&self, scope: WorkspaceId, cancel: &CancelSignal) -> ServiceResult<()> {
        cancel.check()?;
        self.counters.queries.fetch_add(1, Ordering::SeqCst);
        if self.data.failing_databases.contains(&scope.get()) {
            return Err(ServiceError::Query(format!(
                "cannot open database for workspace {}",
                scope
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl QueryExecutor for FixtureBackend {
    async fn execute_scalar(
        &self,
        scope: WorkspaceId,
        query: &SqlQuery,
        cancel: &CancelSignal,
    ) -> ServiceResult<Option<SqlValue>> {
        self.database(scope, cancel)?;
        match query.label {
            WORKSPACE_NAME_QUERY => Ok(self
                .data
                .workspace_name(scope.get())
                .map(SqlValue::from)),
            other => Err(ServiceError::Query(format!("unsupported scalar query '{}'", other))),
        }
    }

    async fn execute_rows(
        &self,
        scope: WorkspaceId,
        query: &SqlQuery,
        cancel: &CancelSignal,
    ) -> ServiceResult<Vec<Row>> {
        self.database(scope, cancel)?;
        match query.label {
            WORKSPACE_SEARCH_QUERY => {
                let limit = query
                    .parameter("@limit")
                    .and_then(SqlValue::as_i64)
                    .unwrap_or(0)
                    .max(0) as usize;
                let needle = query
                    .parameter("@workspaceName")
                    .and_then(SqlValue::as_str)
                    .unwrap_or_default()
                    .to_lowercase();

                let mut ids: Vec<i32> = self
                    .data
                    .workspaces
                    .iter()
                    .filter(|ws| ws.id > 0 && ws.name.to_lowercase().contains(&needle))
                    .map(|ws| ws.id)
                    .collect();
                ids.sort_unstable();
                Ok(ids
                    .into_iter()
                    .take(limit)
                    .map(|id| vec![SqlValue::from(id)])
                    .collect())
            }
            other => Err(ServiceError::Query(format!("unsupported row query '{}'", other))),
        }
    }
}

impl ProxyFactory for FixtureBackend {
    fn library_applications(
        &self,
        identity: ExecutionIdentity,
    ) -> ServiceResult<Proxy<dyn LibraryApplicationManager>> {
        let capability: Arc<dyn LibraryApplicationManager> =
            self.capability(CapabilityKind::LibraryApplications, identity)?;
        Ok(Proxy::new(capability, identity))
    }

    fn audit_metrics(
        &self,
        identity: ExecutionIdentity,
    ) -> ServiceResult<Proxy<dyn AuditMetricsService>> {
        let capability: Arc<dyn AuditMetricsService> =
            self.capability(CapabilityKind::AuditMetrics, identity)?;
        Ok(Proxy::new(capability, identity))
    }

    fn audit_object_manager(
        &self,
        identity: ExecutionIdentity,
    ) -> ServiceResult<Proxy<dyn AuditObjectManager>> {
        let capability: Arc<dyn AuditObjectManager> =
            self.capability(CapabilityKind::AuditObjectManager, identity)?;
        Ok(Proxy::new(capability, identity))
    }

    fn reviewer_statistics(
        &self,
        identity: ExecutionIdentity,
    ) -> ServiceResult<Proxy<dyn ReviewerStatisticsService>> {
        let capability: Arc<dyn ReviewerStatisticsService> =
            self.capability(CapabilityKind::ReviewerStatistics, identity)?;
        Ok(Proxy::new(capability, identity))
    }

    fn audit_pivot(
        &self,
        identity: ExecutionIdentity,
    ) -> ServiceResult<Proxy<dyn AuditPivotService>> {
        let capability: Arc<dyn AuditPivotService> =
            self.capability(CapabilityKind::AuditPivot, identity)?;
        Ok(Proxy::new(capability, identity))
    }
}

/// One proxied capability backed by [`FixtureData`]
struct FixtureCapability {
    kind: CapabilityKind,
    data: Arc<FixtureData>,
    counters: Arc<Counters>,
}

impl FixtureCapability {
    fn begin(&self, cancel: &CancelSignal) -> ServiceResult<()> {
        cancel.check()?;
        if self.data.failing.contains(&self.kind) {
            return Err(ServiceError::OperationFailed(format!(
                "{} returned an error",
                self.kind.name()
            )));
        }
        Ok(())
    }
}

impl Capability for FixtureCapability {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn release(&self) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl LibraryApplicationManager for FixtureCapability {
    async fn read_all(
        &self,
        _scope: WorkspaceId,
        cancel: &CancelSignal,
    ) -> ServiceResult<Vec<ApplicationInfo>> {
        self.begin(cancel)?;
        Ok(self.data.applications.clone())
    }
}

#[async_trait]
impl AuditMetricsService for FixtureCapability {
    async fn workspace_audit_metrics(
        &self,
        scope: WorkspaceId,
        cancel: &CancelSignal,
    ) -> ServiceResult<MetricRecord> {
        self.begin(cancel)?;
        Ok(self
            .data
            .metrics
            .iter()
            .find(|record| record.workspace_id == scope)
            .cloned()
            .unwrap_or_else(|| MetricRecord {
                workspace_id: scope,
                values: serde_json::Map::new(),
            }))
    }
}

#[async_trait]
impl AuditObjectManager for FixtureCapability {
    async fn query_slim(
        &self,
        scope: WorkspaceId,
        request: &AuditQueryRequest,
        start: usize,
        length: usize,
        cancel: &CancelSignal,
    ) -> ServiceResult<QueryResultSlim> {
        self.begin(cancel)?;
        let mut audits: Vec<&AuditFixture> = self
            .data
            .audits
            .iter()
            .filter(|audit| audit.workspace_id == scope.get())
            .collect();
        audits.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        let newest_first = request
            .sorts
            .first()
            .is_some_and(|sort| sort.direction == SortDirection::Descending);
        if newest_first {
            audits.reverse();
        }

        let total_count = audits.len();
        let objects = audits
            .into_iter()
            .skip(start)
            .take(length)
            .map(|audit| ObjectSlim {
                artifact_id: None,
                values: request
                    .fields
                    .iter()
                    .map(|field| {
                        if field.is_named("Audit ID") {
                            serde_json::Value::from(audit.audit_id.clone())
                        } else if field.is_named("Timestamp") {
                            serde_json::Value::from(audit.timestamp.clone())
                        } else {
                            serde_json::Value::Null
                        }
                    })
                    .collect(),
            })
            .collect();
        Ok(QueryResultSlim {
            objects,
            total_count,
        })
    }
}

#[async_trait]
impl ReviewerStatisticsService for FixtureCapability {
    async fn reviewer_stats(
        &self,
        scope: WorkspaceId,
        request: &ReviewerStatsRequest,
        cancel: &CancelSignal,
    ) -> ServiceResult<Vec<ReviewerStats>> {
        self.begin(cancel)?;
        self.counters.stats_requests.lock().push(request.clone());
        Ok(self
            .data
            .reviewer_stats
            .iter()
            .filter(|entry| entry.workspace_id == scope.get())
            .flat_map(|entry| entry.stats.iter().cloned())
            .collect())
    }

    async fn reviewer_choices(
        &self,
        _scope: WorkspaceId,
        criteria: &ReviewerChoicesCriteria,
        cancel: &CancelSignal,
    ) -> ServiceResult<serde_json::Value> {
        self.begin(cancel)?;
        Ok(self.data.reviewer_choices.clone().unwrap_or_else(|| {
            serde_json::json!({ "field_ids": criteria.field_ids, "users": [] })
        }))
    }
}

#[async_trait]
impl AuditPivotService for FixtureCapability {
    async fn pivot(
        &self,
        _scope: WorkspaceId,
        query: &PivotQuery,
        cancel: &CancelSignal,
    ) -> ServiceResult<serde_json::Value> {
        self.begin(cancel)?;
        Ok(self.data.pivot.clone().unwrap_or_else(|| {
            serde_json::json!({ "group_by": query.group_by.name, "rows": [] })
        }))
    }
}
