//! Workspace lookup and search

use crate::models::WorkspaceModel;
use crate::ports::{SqlQuery, SqlValue};
use crate::service::JrTestService;
use jrtest_core::{
    CancelSignal, FaultSafeInfo, ServiceContext, ServiceError, ServiceResult, WorkspaceId,
};

/// Label of the workspace name lookup
pub const WORKSPACE_NAME_QUERY: &str = "workspace.name";

/// Label of the workspace id search
pub const WORKSPACE_SEARCH_QUERY: &str = "workspace.search";

fn workspace_name_query() -> SqlQuery {
    SqlQuery::new(
        WORKSPACE_NAME_QUERY,
        "SELECT [TextIdentifier] FROM [EDDSDBO].[Artifact] WHERE [ArtifactTypeID] = 8",
    )
}

fn workspace_search_query(query: &str, limit: i32) -> SqlQuery {
    SqlQuery::new(
        WORKSPACE_SEARCH_QUERY,
        "SELECT TOP (@limit) [ArtifactID] FROM [Case] \
         WHERE [ArtifactID] > 0 AND [Name] LIKE '%'+@workspaceName+'%' \
         ORDER BY [ArtifactID]",
    )
    .bind("@limit", limit)
    .bind("@workspaceName", query)
}

impl JrTestService {
    /// Name of workspace `id`.
    ///
    /// Any failure, including an empty result, is reported as
    /// [`ServiceError::NotFound`] carrying the workspace and the time.
    pub async fn lookup_workspace(
        &self,
        id: WorkspaceId,
        cancel: &CancelSignal,
    ) -> ServiceResult<WorkspaceModel> {
        let outcome = self
            .deps
            .executor
            .execute_scalar(id, &workspace_name_query(), cancel)
            .await;

        let failure = match outcome {
            Ok(Some(SqlValue::Text(name))) => return Ok(WorkspaceModel { name }),
            Ok(Some(other)) if !other.is_null() => {
                format!("unexpected workspace name value {:?}", other)
            }
            Ok(_) => "no workspace name returned".to_string(),
            Err(ServiceError::Cancelled) => return Err(ServiceError::Cancelled),
            Err(e) => e.to_string(),
        };

        tracing::warn!(workspace_id = %id, error = %failure, "Could not read workspace");
        Err(ServiceError::not_found_with(
            format!("Workspace {} not found.", id),
            FaultSafeInfo::new(format!("Workspace {}", id), self.deps.clock.now()),
        ))
    }

    /// Workspaces whose name contains `query`, in ascending artifact id order.
    ///
    /// `query` must be non-empty and no longer than the configured maximum;
    /// this is checked before any I/O. A non-positive `limit` yields no
    /// workspaces. Candidates that no longer resolve are skipped.
    pub async fn search_workspaces(
        &self,
        ctx: &ServiceContext,
        query: &str,
        limit: i32,
        cancel: &CancelSignal,
    ) -> ServiceResult<Vec<WorkspaceModel>> {
        let max_len = ctx.config.search.max_query_len;
        if query.is_empty() || query.chars().count() > max_len {
            return Err(ServiceError::Validation(format!(
                "queryString cannot be empty or greater than {} characters.",
                max_len
            )));
        }
        if limit <= 0 {
            return Ok(Vec::new());
        }

        match self.collect_workspaces(query, limit, cancel).await {
            Ok(models) => Ok(models),
            Err(ServiceError::Cancelled) => Err(ServiceError::Cancelled),
            Err(e) => {
                tracing::warn!(
                    query_string = query,
                    error = %e,
                    "An exception occured during query for workspace(s)"
                );
                Err(ServiceError::not_found(format!(
                    "An exception occured during query for workspace(s) containing {}.",
                    query
                )))
            }
        }
    }

    async fn collect_workspaces(
        &self,
        query: &str,
        limit: i32,
        cancel: &CancelSignal,
    ) -> ServiceResult<Vec<WorkspaceModel>> {
        let rows = self
            .deps
            .executor
            .execute_rows(WorkspaceId::ADMIN, &workspace_search_query(query, limit), cancel)
            .await?;

        let candidates = rows
            .iter()
            .take(limit as usize)
            .map(|row| {
                row.first()
                    .and_then(SqlValue::as_i64)
                    .and_then(|id| i32::try_from(id).ok())
                    .map(WorkspaceId)
                    .ok_or_else(|| {
                        ServiceError::Query(format!("malformed candidate row {:?}", row))
                    })
            })
            .collect::<ServiceResult<Vec<_>>>()?;

        let mut models = Vec::with_capacity(candidates.len());
        for id in candidates {
            cancel.check()?;
            match self.lookup_workspace(id, cancel).await {
                Ok(model) => models.push(model),
                Err(ServiceError::NotFound { .. }) => {
                    tracing::debug!(workspace_id = %id, "Skipping unresolved workspace");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(models)
    }
}
