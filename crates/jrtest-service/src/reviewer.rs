//! Reviewer statistics and reviewer choices

use crate::duration::{parse_minutes, round_minutes};
use crate::models::{
    ReviewModel, ReviewerChoicesCriteria, ReviewerStatistic, ReviewerStats, ReviewerStatsRequest,
};
use crate::service::JrTestService;
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use jrtest_core::{
    CancelSignal, ExecutionIdentity, ResultEnvelope, ServiceContext, ServiceError, ServiceResult,
    WorkspaceId,
};

const REVIEWER_STATISTICS_FAILED: &str = "GetReviewerStatistics Failed";
const REVIEWER_CHOICES_FAILED: &str = "GetReviewerChoices Failed";

/// Timestamp format expected by the reviewer statistics service
const WINDOW_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

fn to_json<T: serde::Serialize>(value: &T) -> ServiceResult<String> {
    serde_json::to_string(value).map_err(|e| ServiceError::Internal(e.to_string()))
}

/// `hours` ending at the last full UTC hour before `now`, formatted
pub(crate) fn stats_window(now: DateTime<Utc>, hours: i64) -> ServiceResult<(String, String)> {
    let end = now
        .duration_trunc(TimeDelta::hours(1))
        .map_err(|e| ServiceError::Internal(format!("reviewer window: {}", e)))?;
    let start = end - TimeDelta::hours(hours);
    Ok((
        start.format(WINDOW_FORMAT).to_string(),
        end.format(WINDOW_FORMAT).to_string(),
    ))
}

/// Outbound records for `stats`, without excluded users
pub(crate) fn outbound_statistics(
    workspace: WorkspaceId,
    stats: Vec<ReviewerStats>,
    excluded: &[i32],
    now: DateTime<Utc>,
) -> Vec<ReviewerStatistic> {
    stats
        .into_iter()
        .filter(|stat| !excluded.contains(&stat.user_id))
        .map(|stat| {
            let total_time_minutes = parse_minutes(&stat.total_usage_time).map(round_minutes);
            if total_time_minutes.is_none() {
                tracing::warn!(
                    workspace_id = %workspace,
                    user_id = stat.user_id,
                    total_usage_time = %stat.total_usage_time,
                    "Unparseable reviewer usage time"
                );
            }
            ReviewerStatistic {
                workspace_id: workspace,
                user_id: stat.user_id,
                mod_date: now,
                total_time: stat.total_usage_time,
                views: stat.views,
                edits: stat.edits,
                mass_edits: stat.mass_edits.unwrap_or(0),
                propagations: stat.propagations.unwrap_or(0),
                total_time_minutes,
            }
        })
        .collect()
}

impl JrTestService {
    /// Reviewer statistics as JSON, recomputed only when there was audit
    /// activity after the caller's last known activity.
    ///
    /// The payload is `None` when nothing changed. Without a last known
    /// activity the baseline is `activity_lookback_hours` before now.
    pub async fn reviewer_statistics_delta(
        &self,
        ctx: &ServiceContext,
        review: &ReviewModel,
        cancel: &CancelSignal,
    ) -> ServiceResult<ResultEnvelope<Option<String>>> {
        let settings = &ctx.config.reviewer;
        let now = self.deps.clock.now();
        let baseline = review
            .last_known_activity
            .unwrap_or(now - TimeDelta::hours(settings.activity_lookback_hours));

        let latest = self
            .latest_audit_time(review.workspace_id, cancel)
            .await?
            .into_payload();
        match latest {
            Some(latest) if latest > baseline => {}
            _ => {
                tracing::debug!(
                    workspace_id = %review.workspace_id,
                    baseline = %baseline,
                    "No reviewer activity since baseline"
                );
                return Ok(ResultEnvelope::ok(None));
            }
        }

        let result: ServiceResult<Option<String>> = async {
            let stats = self.fetch_reviewer_stats(ctx, review, now, cancel).await?;
            let records =
                outbound_statistics(review.workspace_id, stats, &settings.excluded_user_ids, now);
            to_json(&records).map(Some)
        }
        .await;

        if let Err(e) = &result {
            tracing::warn!(
                workspace_id = %review.workspace_id,
                error = %e,
                "Reviewer statistics failed"
            );
        }
        ResultEnvelope::capture(result, REVIEWER_STATISTICS_FAILED)
    }

    async fn fetch_reviewer_stats(
        &self,
        ctx: &ServiceContext,
        review: &ReviewModel,
        now: DateTime<Utc>,
        cancel: &CancelSignal,
    ) -> ServiceResult<Vec<ReviewerStats>> {
        let (start_date, end_date) = stats_window(now, ctx.config.reviewer.stats_window_hours)?;
        let offset_hours = f64::from(self.deps.clock.local_offset().local_minus_utc()) / 3600.0;

        let request = ReviewerStatsRequest {
            start_date,
            end_date,
            time_zone: offset_hours,
            non_admin: false,
            additional_actions: review.additional_actions.clone(),
        };

        let service = self
            .deps
            .proxies
            .reviewer_statistics(ExecutionIdentity::CurrentUser)?;
        service
            .reviewer_stats(review.workspace_id, &request, cancel)
            .await
    }

    /// Reviewer choice report over the last `choices_lookback_days`, as JSON
    pub async fn reviewer_choices(
        &self,
        ctx: &ServiceContext,
        workspace: WorkspaceId,
        field_ids: &[i32],
        cancel: &CancelSignal,
    ) -> ServiceResult<ResultEnvelope<String>> {
        let settings = &ctx.config.reviewer;
        let now = self.deps.clock.now();
        let criteria = ReviewerChoicesCriteria {
            field_ids: field_ids.to_vec(),
            user_ids_to_exclude: settings.excluded_user_ids.clone(),
            start_date: now - TimeDelta::days(settings.choices_lookback_days),
            end_date: now,
            time_zone: settings.time_zone.clone(),
        };

        let result: ServiceResult<String> = async {
            let service = self
                .deps
                .proxies
                .reviewer_statistics(ExecutionIdentity::System)?;
            let report = service.reviewer_choices(workspace, &criteria, cancel).await?;
            to_json(&report)
        }
        .await;

        if let Err(e) = &result {
            tracing::warn!(workspace_id = %workspace, error = %e, "Reviewer choices failed");
        }
        ResultEnvelope::capture(result, REVIEWER_CHOICES_FAILED)
    }
}
