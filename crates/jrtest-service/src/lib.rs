//! jrtest-service - The JRTestService module
//!
//! Workspace lookup and search, application listing, audit metrics and
//! reviewer reporting, each answered through the
//! [`ResultEnvelope`](jrtest_core::ResultEnvelope) protocol.
//!
//! Collaborators are injected through [`ServiceDependencies`]:
//! - [`QueryExecutor`] runs parameterized SQL against a workspace database
//! - [`ProxyFactory`] hands out scoped [`Proxy`] handles to platform services
//! - [`Clock`](jrtest_core::Clock) supplies the current time
//!
//! [`FixtureBackend`] implements both collaborator ports in memory.
//!
//! # Example
//!
//! ```ignore
//! use jrtest_service::{FixtureBackend, FixtureData, JrTestService, ServiceDependencies};
//! use std::sync::Arc;
//!
//! let backend = Arc::new(FixtureBackend::new(FixtureData::default()));
//! let service = JrTestService::new(ServiceDependencies::new(backend.clone(), backend));
//! ```

mod applications;
mod audit;
mod duration;
mod fixture;
mod models;
mod pivot;
mod ports;
mod reviewer;
mod service;
mod workspace;

pub use audit::parse_audit_id;
pub use duration::{parse_minutes, round_minutes};
pub use fixture::{
    AuditFixture, CapabilityKind, FixtureBackend, FixtureData, ReviewerStatsFixture,
    WorkspaceFixture,
};
pub use models::{
    ApplicationInfo, AuditQueryRequest, ChoicesRequest, FieldRef, MetricRecord, ObjectSetQuery,
    ObjectSlim, PivotQuery, QueryResultSlim, ReviewModel, ReviewerChoicesCriteria,
    ReviewerStatistic, ReviewerStats, ReviewerStatsRequest, ScopeRequest, SearchRequest, Sort,
    SortDirection, WorkspaceModel,
};
pub use ports::{
    AuditMetricsService, AuditObjectManager, AuditPivotService, Capability,
    LibraryApplicationManager, Proxy, ProxyFactory, QueryExecutor, ReviewerStatisticsService, Row,
    SqlQuery, SqlValue,
};
pub use service::{JrTestService, ServiceDependencies};
pub use workspace::{WORKSPACE_NAME_QUERY, WORKSPACE_SEARCH_QUERY};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        FixtureBackend, FixtureData, JrTestService, Proxy, ProxyFactory, QueryExecutor,
        ServiceDependencies,
    };
}
