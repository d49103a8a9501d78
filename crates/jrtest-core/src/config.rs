//! Service module configuration

use serde::{Deserialize, Serialize};

/// Configuration handed to the module when it is registered with the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Free-form deployment data (connection names, feature flags, ...)
    #[serde(default)]
    pub data: serde_json::Value,

    /// Number of async worker threads (default: number of CPU cores)
    #[serde(default)]
    pub worker_threads: Option<usize>,

    /// Initial log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Maximum concurrent in-flight requests
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_ops: usize,

    /// Shutdown timeout in milliseconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_ms: u64,

    /// Per-request timeout in milliseconds (no timeout when unset)
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,

    /// Include fault-safe diagnostic payloads in fault bodies
    #[serde(default)]
    pub diagnostic_mode: bool,

    #[serde(default)]
    pub search: SearchSettings,

    #[serde(default)]
    pub reviewer: ReviewerSettings,

    #[serde(default)]
    pub pivot: PivotSettings,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_concurrent() -> usize {
    1000
}

fn default_shutdown_timeout() -> u64 {
    5000
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data: serde_json::Value::Null,
            worker_threads: None,
            log_level: default_log_level(),
            max_concurrent_ops: default_max_concurrent(),
            shutdown_timeout_ms: default_shutdown_timeout(),
            request_timeout_ms: None,
            diagnostic_mode: false,
            search: SearchSettings::default(),
            reviewer: ReviewerSettings::default(),
            pivot: PivotSettings::default(),
        }
    }
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from JSON bytes (empty input yields defaults)
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes)
    }

    /// Get a typed value from the free-form data
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Set a value in the free-form data
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(value)?;
        match self.data.as_object_mut() {
            Some(obj) => {
                obj.insert(key.to_string(), value);
            }
            None => {
                let mut obj = serde_json::Map::new();
                obj.insert(key.to_string(), value);
                self.data = serde_json::Value::Object(obj);
            }
        }
        Ok(())
    }
}

/// Workspace search limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Result count used when the caller does not pass `limit`
    #[serde(default = "default_search_limit")]
    pub default_limit: i32,

    /// Longest accepted query string, in characters
    #[serde(default = "default_max_query_len")]
    pub max_query_len: usize,
}

fn default_search_limit() -> i32 {
    10
}

fn default_max_query_len() -> usize {
    50
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_limit: default_search_limit(),
            max_query_len: default_max_query_len(),
        }
    }
}

/// Reviewer statistics and choices reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewerSettings {
    /// Service accounts that never show up in reviewer output
    #[serde(default = "default_excluded_users")]
    pub excluded_user_ids: Vec<i32>,

    /// Baseline for "last known activity" when the caller omits it
    #[serde(default = "default_lookback_hours")]
    pub activity_lookback_hours: i64,

    /// Length of the statistics window ending at the last full hour
    #[serde(default = "default_window_hours")]
    pub stats_window_hours: i64,

    /// Length of the reviewer choices window ending now
    #[serde(default = "default_choices_days")]
    pub choices_lookback_days: i64,

    /// IANA zone name passed to the choices report
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

fn default_excluded_users() -> Vec<i32> {
    vec![777]
}

fn default_lookback_hours() -> i64 {
    24
}

fn default_window_hours() -> i64 {
    1
}

fn default_choices_days() -> i64 {
    5
}

fn default_time_zone() -> String {
    "America/Chicago".to_string()
}

impl Default for ReviewerSettings {
    fn default() -> Self {
        Self {
            excluded_user_ids: default_excluded_users(),
            activity_lookback_hours: default_lookback_hours(),
            stats_window_hours: default_window_hours(),
            choices_lookback_days: default_choices_days(),
            time_zone: default_time_zone(),
        }
    }
}

/// Audit pivot query parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PivotSettings {
    #[serde(default = "default_group_by")]
    pub group_by: String,

    /// Field artifact id to pivot on
    #[serde(default = "default_pivot_on")]
    pub pivot_on_field_id: i32,

    #[serde(default = "default_pivot_condition")]
    pub condition: String,

    #[serde(default = "default_max_columns")]
    pub maximum_columns: u32,

    #[serde(default = "default_pivot_timeout")]
    pub timeout_secs: u32,

    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

fn default_group_by() -> String {
    "Timestamp".to_string()
}

fn default_pivot_on() -> i32 {
    1_039_646
}

fn default_pivot_condition() -> String {
    "(('Object Type' == CHOICE 1048471))".to_string()
}

fn default_max_columns() -> u32 {
    10
}

fn default_pivot_timeout() -> u32 {
    30
}

impl Default for PivotSettings {
    fn default() -> Self {
        Self {
            group_by: default_group_by(),
            pivot_on_field_id: default_pivot_on(),
            condition: default_pivot_condition(),
            maximum_columns: default_max_columns(),
            timeout_secs: default_pivot_timeout(),
            time_zone: default_time_zone(),
        }
    }
}

/// Module identification reported to the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceMetadata {
    pub name: String,

    /// Semver
    pub version: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub authors: Vec<String>,

    /// Route prefix under which the host mounts the module
    #[serde(default)]
    pub route_prefix: Option<String>,
}

impl ServiceMetadata {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: None,
            authors: Vec::new(),
            route_prefix: None,
        }
    }

    pub fn with_route_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.route_prefix = Some(prefix.into());
        self
    }
}

#[cfg(test)]
#[path = "config/config_tests.rs"]
mod config_tests;

#[cfg(test)]
#[path = "config/config_parameterized_tests.rs"]
mod config_parameterized_tests;
