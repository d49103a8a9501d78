//! The JRTestService module and its route dispatch

use crate::models::{ChoicesRequest, ReviewModel, ScopeRequest, SearchRequest};
use crate::ports::{ProxyFactory, QueryExecutor};
use async_trait::async_trait;
use jrtest_core::{
    Clock, RequestContext, ResultEnvelope, ServiceContext, ServiceError, ServiceMetadata,
    ServiceModule, ServiceResult, SystemClock,
};
use jrtest_transport::{Codec, JsonCodec, ROUTE_PREFIX, Route};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Collaborators handed to the service at construction
#[derive(Clone)]
pub struct ServiceDependencies {
    pub(crate) executor: Arc<dyn QueryExecutor>,
    pub(crate) proxies: Arc<dyn ProxyFactory>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl ServiceDependencies {
    /// Dependencies using the system clock
    pub fn new(executor: Arc<dyn QueryExecutor>, proxies: Arc<dyn ProxyFactory>) -> Self {
        Self {
            executor,
            proxies,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// Workspace and audit reporting service
///
/// Every operation is stateless; proxies are acquired and released within
/// the call.
pub struct JrTestService {
    pub(crate) deps: ServiceDependencies,
    codec: JsonCodec,
}

impl JrTestService {
    pub fn new(deps: ServiceDependencies) -> Self {
        Self {
            deps,
            codec: JsonCodec::new(),
        }
    }

    fn decode<T: DeserializeOwned>(&self, payload: &[u8]) -> ServiceResult<T> {
        Ok(self.codec.decode_body(payload)?)
    }

    fn encode<T: Serialize>(&self, envelope: &ResultEnvelope<T>) -> ServiceResult<Vec<u8>> {
        Ok(self.codec.encode(envelope)?)
    }
}

#[async_trait]
impl ServiceModule for JrTestService {
    async fn on_start(&self, ctx: &ServiceContext) -> ServiceResult<()> {
        tracing::info!(
            routes = Route::ALL.len(),
            excluded_users = ?ctx.config.reviewer.excluded_user_ids,
            "JRTestService starting"
        );
        Ok(())
    }

    async fn handle_request(
        &self,
        ctx: &ServiceContext,
        request: &RequestContext,
        payload: &[u8],
    ) -> ServiceResult<Vec<u8>> {
        let route = Route::from_tag(&request.route)
            .ok_or_else(|| ServiceError::UnknownRoute(request.route.clone()))?;
        let cancel = &request.cancel;
        tracing::debug!(route = %route, request_id = request.request_id, "Handling request");

        match route {
            Route::WorkspaceGet => {
                let req: ScopeRequest = self.decode(payload)?;
                let model = self.lookup_workspace(req.workspace_id, cancel).await?;
                self.encode(&ResultEnvelope::ok(model))
            }
            Route::WorkspaceSearch => {
                let req: SearchRequest = self.decode(payload)?;
                let limit = req.limit.unwrap_or(ctx.config.search.default_limit);
                let models = self
                    .search_workspaces(ctx, &req.query_string, limit, cancel)
                    .await?;
                self.encode(&ResultEnvelope::ok(models))
            }
            Route::ApplicationList => self.encode(&self.list_applications(cancel).await?),
            Route::AuditMetrics => {
                let req: ScopeRequest = self.decode(payload)?;
                self.encode(&self.audit_metrics(req.workspace_id, cancel).await?)
            }
            Route::AuditLatestId => {
                let req: ScopeRequest = self.decode(payload)?;
                self.encode(&self.latest_audit_id(req.workspace_id, cancel).await?)
            }
            Route::AuditLatestTime => {
                let req: ScopeRequest = self.decode(payload)?;
                self.encode(&self.latest_audit_time(req.workspace_id, cancel).await?)
            }
            Route::ReviewerStatistics => {
                let req: ReviewModel = self.decode(payload)?;
                self.encode(&self.reviewer_statistics_delta(ctx, &req, cancel).await?)
            }
            Route::ReviewerChoices => {
                let req: ChoicesRequest = self.decode(payload)?;
                self.encode(
                    &self
                        .reviewer_choices(ctx, req.workspace_id, &req.field_ids, cancel)
                        .await?,
                )
            }
            Route::AuditPivot => {
                let req: ScopeRequest = self.decode(payload)?;
                self.encode(&self.pivot_query(ctx, req.workspace_id, cancel).await?)
            }
        }
    }

    async fn on_stop(&self, _ctx: &ServiceContext) -> ServiceResult<()> {
        tracing::info!("JRTestService stopped");
        Ok(())
    }

    fn metadata(&self) -> Option<ServiceMetadata> {
        let mut metadata = ServiceMetadata::new("JRTestService", env!("CARGO_PKG_VERSION"))
            .with_route_prefix(ROUTE_PREFIX);
        metadata.description =
            Some("Workspace lookup, audit metrics and reviewer reporting".to_string());
        Some(metadata)
    }

    fn routes(&self) -> Vec<&'static str> {
        Route::ALL.iter().map(|route| route.tag()).collect()
    }
}
