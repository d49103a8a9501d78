//! Request and response models

use chrono::{DateTime, Utc};
use jrtest_core::WorkspaceId;
use serde::{Deserialize, Serialize};

// ============================================================================
// Route payloads
// ============================================================================

/// Payload of every route addressed by workspace id
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScopeRequest {
    #[serde(alias = "workspaceId", alias = "workspaceID")]
    pub workspace_id: WorkspaceId,
}

/// `workspace.search` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(alias = "queryString", default)]
    pub query_string: String,

    /// Falls back to the configured default when absent
    #[serde(default)]
    pub limit: Option<i32>,
}

/// `reviewer.statistics` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewModel {
    #[serde(alias = "workspaceId")]
    pub workspace_id: WorkspaceId,

    /// Newest activity the caller has already seen
    #[serde(alias = "lastKnownActivity", default)]
    pub last_known_activity: Option<DateTime<Utc>>,

    #[serde(alias = "additionalActions", default)]
    pub additional_actions: Option<String>,
}

/// `reviewer.choices` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoicesRequest {
    #[serde(alias = "workspaceId")]
    pub workspace_id: WorkspaceId,

    #[serde(alias = "fieldIds", default)]
    pub field_ids: Vec<i32>,
}

// ============================================================================
// Results
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkspaceModel {
    pub name: String,
}

/// Library application installed on the instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationInfo {
    pub name: String,

    #[serde(default)]
    pub guid: Option<uuid::Uuid>,

    #[serde(default)]
    pub version: Option<String>,
}

/// Aggregated audit metrics for one workspace, passed through as reported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub workspace_id: WorkspaceId,

    #[serde(flatten)]
    pub values: serde_json::Map<String, serde_json::Value>,
}

/// Per-user statistics as reported by the reviewer statistics service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewerStats {
    pub user_id: i32,

    #[serde(default)]
    pub full_name: Option<String>,

    /// `[d.]hh:mm:ss[.f]`
    pub total_usage_time: String,

    #[serde(default)]
    pub views: i32,

    #[serde(default)]
    pub edits: i32,

    #[serde(default)]
    pub mass_edits: Option<i32>,

    #[serde(default)]
    pub propagations: Option<i32>,
}

/// Outbound reviewer statistic record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewerStatistic {
    pub workspace_id: WorkspaceId,
    pub user_id: i32,
    pub mod_date: DateTime<Utc>,
    pub total_time: String,
    pub views: i32,
    pub edits: i32,
    pub mass_edits: i32,
    pub propagations: i32,
    /// `None` when `total_time` could not be parsed
    pub total_time_minutes: Option<f64>,
}

// ============================================================================
// Downstream requests
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<i32>,
}

impl FieldRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            artifact_id: None,
        }
    }

    pub fn artifact(artifact_id: i32) -> Self {
        Self {
            name: None,
            artifact_id: Some(artifact_id),
        }
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: FieldRef,
    pub direction: SortDirection,
}

/// Audit object query
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditQueryRequest {
    pub fields: Vec<FieldRef>,

    #[serde(default)]
    pub condition: String,

    #[serde(default)]
    pub row_condition: String,

    #[serde(default)]
    pub sorts: Vec<Sort>,
}

impl AuditQueryRequest {
    /// Single field, newest audit first
    pub fn newest_first(field: &str) -> Self {
        Self {
            fields: vec![FieldRef::named(field)],
            condition: String::new(),
            row_condition: String::new(),
            sorts: vec![Sort {
                field: FieldRef::named("Timestamp"),
                direction: SortDirection::Descending,
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectSlim {
    #[serde(default)]
    pub artifact_id: Option<i64>,

    /// One value per requested field, in request order
    #[serde(default)]
    pub values: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryResultSlim {
    #[serde(default)]
    pub objects: Vec<ObjectSlim>,

    #[serde(default)]
    pub total_count: usize,
}

impl QueryResultSlim {
    /// First value of the first object
    pub fn first_value(&self) -> Option<&serde_json::Value> {
        self.objects.first().and_then(|object| object.values.first())
    }
}

/// Reviewer statistics window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewerStatsRequest {
    /// `%Y-%m-%dT%H:%M:%S%:z`
    pub start_date: String,
    pub end_date: String,
    /// Local offset from UTC in hours
    pub time_zone: f64,
    pub non_admin: bool,
    #[serde(default)]
    pub additional_actions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewerChoicesCriteria {
    pub field_ids: Vec<i32>,
    pub user_ids_to_exclude: Vec<i32>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// IANA zone name
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObjectSetQuery {
    pub condition: String,
    pub row_condition: String,
}

/// Audit pivot settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotQuery {
    pub group_by: FieldRef,
    pub pivot_on: FieldRef,
    pub object_set_query: ObjectSetQuery,
    pub convert_number_field_values_to_string: bool,
    pub maximum_number_of_columns: u32,
    /// Seconds
    pub timeout: u32,
    pub raw_data_only: bool,
    pub time_zone: String,
}
