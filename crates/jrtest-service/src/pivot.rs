//! Audit pivot query

use crate::models::{FieldRef, ObjectSetQuery, PivotQuery};
use crate::service::JrTestService;
use jrtest_core::{
    CancelSignal, ExecutionIdentity, PivotSettings, ResultEnvelope, ServiceContext, ServiceError,
    ServiceResult, WorkspaceId,
};

const PIVOT_QUERY_FAILED: &str = "GetPivotQuery Failed";

impl From<&PivotSettings> for PivotQuery {
    fn from(settings: &PivotSettings) -> Self {
        PivotQuery {
            group_by: FieldRef::named(settings.group_by.clone()),
            pivot_on: FieldRef::artifact(settings.pivot_on_field_id),
            object_set_query: ObjectSetQuery {
                condition: settings.condition.clone(),
                row_condition: String::new(),
            },
            convert_number_field_values_to_string: true,
            maximum_number_of_columns: settings.maximum_columns,
            timeout: settings.timeout_secs,
            raw_data_only: false,
            time_zone: settings.time_zone.clone(),
        }
    }
}

impl JrTestService {
    /// Audit pivot over the configured settings, as JSON
    pub async fn pivot_query(
        &self,
        ctx: &ServiceContext,
        workspace: WorkspaceId,
        cancel: &CancelSignal,
    ) -> ServiceResult<ResultEnvelope<String>> {
        let query = PivotQuery::from(&ctx.config.pivot);
        tracing::debug!(
            workspace_id = %workspace,
            pivot_on = ?query.pivot_on.artifact_id,
            "Running audit pivot"
        );

        let result: ServiceResult<String> = async {
            let pivot = self.deps.proxies.audit_pivot(ExecutionIdentity::System)?;
            let result_set = pivot.pivot(workspace, &query, cancel).await?;
            serde_json::to_string(&result_set).map_err(|e| ServiceError::Internal(e.to_string()))
        }
        .await;

        if let Err(e) = &result {
            tracing::warn!(workspace_id = %workspace, error = %e, "Audit pivot failed");
        }
        ResultEnvelope::capture(result, PIVOT_QUERY_FAILED)
    }
}
