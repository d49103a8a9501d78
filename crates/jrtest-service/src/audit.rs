//! Audit metrics and latest-audit queries

use crate::models::{AuditQueryRequest, MetricRecord, QueryResultSlim};
use crate::service::JrTestService;
use chrono::{DateTime, NaiveDateTime, Utc};
use jrtest_core::{
    CancelSignal, ExecutionIdentity, ResultEnvelope, ServiceError, ServiceResult, WorkspaceId,
};

const WORKSPACE_AUDIT_FAILED: &str = "GetWorkspaceAudit Failed";
const LAST_AUDIT_ID_FAILED: &str = "GetLastAuditId Failed";
const LATEST_TIMESTAMP_FAILED: &str = "Get latest timestamp Failed";
const AUDIT_ID_UNPARSEABLE: &str = "Audit ID could not be parsed";

/// Numeric audit id from the composite `{workspace}-{id}` form.
///
/// A leading `{workspace}-` prefix and every remaining `-` are removed
/// before parsing; a bare id is parsed as is.
pub fn parse_audit_id(raw: &str, workspace: WorkspaceId) -> Option<i64> {
    let raw = raw.trim();
    let id = raw.strip_prefix(&format!("{}-", workspace)).unwrap_or(raw);
    id.replace('-', "").parse().ok()
}

fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%m/%d/%Y %I:%M:%S %p"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

impl JrTestService {
    /// Aggregated audit metrics for a workspace
    pub async fn audit_metrics(
        &self,
        workspace: WorkspaceId,
        cancel: &CancelSignal,
    ) -> ServiceResult<ResultEnvelope<Vec<MetricRecord>>> {
        let result: ServiceResult<Vec<MetricRecord>> = async {
            let metrics = self.deps.proxies.audit_metrics(ExecutionIdentity::System)?;
            let record = metrics.workspace_audit_metrics(workspace, cancel).await?;
            Ok(vec![record])
        }
        .await;

        if let Err(e) = &result {
            tracing::warn!(workspace_id = %workspace, error = %e, "Workspace audit metrics failed");
        }
        ResultEnvelope::capture(result, WORKSPACE_AUDIT_FAILED)
    }

    /// Id of the newest audit record, `0` when the workspace has none
    pub async fn latest_audit_id(
        &self,
        workspace: WorkspaceId,
        cancel: &CancelSignal,
    ) -> ServiceResult<ResultEnvelope<i64>> {
        let raw = match self.newest_audit_value(workspace, "Audit ID", cancel).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(
                    workspace_id = %workspace,
                    error = %e,
                    "Latest audit id query failed"
                );
                return ResultEnvelope::capture(Err(e), LAST_AUDIT_ID_FAILED);
            }
        };

        let Some(raw) = raw else {
            return Ok(ResultEnvelope::ok(0));
        };
        match parse_audit_id(&raw, workspace) {
            Some(id) => Ok(ResultEnvelope::ok(id)),
            None => {
                tracing::warn!(
                    workspace_id = %workspace,
                    value = %raw,
                    "Audit ID could not be parsed"
                );
                let err = ServiceError::Parse(format!("audit id '{}' is not numeric", raw));
                Ok(ResultEnvelope::operation_failed(0, AUDIT_ID_UNPARSEABLE, &err))
            }
        }
    }

    /// Timestamp of the newest audit record.
    ///
    /// `None` when there is no record or its timestamp cannot be read.
    pub async fn latest_audit_time(
        &self,
        workspace: WorkspaceId,
        cancel: &CancelSignal,
    ) -> ServiceResult<ResultEnvelope<Option<DateTime<Utc>>>> {
        let result = self
            .newest_audit_value(workspace, "Timestamp", cancel)
            .await
            .map(|raw| {
                let parsed = raw.as_deref().and_then(parse_timestamp);
                if parsed.is_none() {
                    if let Some(raw) = &raw {
                        tracing::debug!(
                            workspace_id = %workspace,
                            value = %raw,
                            "Unreadable audit timestamp"
                        );
                    }
                }
                parsed
            });

        if let Err(e) = &result {
            tracing::warn!(
                workspace_id = %workspace,
                error = %e,
                "Latest audit timestamp query failed"
            );
        }
        ResultEnvelope::capture(result, LATEST_TIMESTAMP_FAILED)
    }

    /// `field` of the newest audit record, as text
    async fn newest_audit_value(
        &self,
        workspace: WorkspaceId,
        field: &str,
        cancel: &CancelSignal,
    ) -> ServiceResult<Option<String>> {
        let manager = self
            .deps
            .proxies
            .audit_object_manager(ExecutionIdentity::System)?;
        let result: QueryResultSlim = manager
            .query_slim(workspace, &AuditQueryRequest::newest_first(field), 0, 1, cancel)
            .await?;
        Ok(result.first_value().map(value_text))
    }
}
