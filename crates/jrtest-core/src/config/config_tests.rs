#![allow(non_snake_case)]

use super::*;

#[test]
fn ServiceConfig___default___has_host_defaults() {
    let config = ServiceConfig::default();

    assert_eq!(config.log_level, "info");
    assert_eq!(config.max_concurrent_ops, 1000);
    assert_eq!(config.shutdown_timeout_ms, 5000);
    assert!(config.worker_threads.is_none());
    assert!(config.request_timeout_ms.is_none());
    assert!(!config.diagnostic_mode);
}

#[test]
fn ServiceConfig___default___has_reporting_defaults() {
    let config = ServiceConfig::default();

    assert_eq!(config.search.default_limit, 10);
    assert_eq!(config.search.max_query_len, 50);
    assert_eq!(config.reviewer.excluded_user_ids, vec![777]);
    assert_eq!(config.reviewer.activity_lookback_hours, 24);
    assert_eq!(config.reviewer.stats_window_hours, 1);
    assert_eq!(config.reviewer.choices_lookback_days, 5);
    assert_eq!(config.reviewer.time_zone, "America/Chicago");
    assert_eq!(config.pivot.group_by, "Timestamp");
    assert_eq!(config.pivot.pivot_on_field_id, 1_039_646);
    assert_eq!(config.pivot.maximum_columns, 10);
    assert_eq!(config.pivot.timeout_secs, 30);
}

#[test]
fn ServiceConfig___from_json_empty___returns_default() {
    let config = ServiceConfig::from_json(b"").unwrap();

    assert_eq!(config.log_level, "info");
    assert_eq!(config.search.default_limit, 10);
}

#[test]
fn ServiceConfig___from_json_partial_section___fills_missing_fields() {
    let json = r#"{"reviewer": {"excluded_user_ids": [1, 2]}}"#;

    let config = ServiceConfig::from_json(json.as_bytes()).unwrap();

    assert_eq!(config.reviewer.excluded_user_ids, vec![1, 2]);
    assert_eq!(config.reviewer.stats_window_hours, 1);
    assert_eq!(config.reviewer.time_zone, "America/Chicago");
}

#[test]
fn ServiceConfig___from_json_invalid___returns_error() {
    let result = ServiceConfig::from_json(b"{not json");

    assert!(result.is_err());
}

#[test]
fn ServiceConfig___set___works_when_data_is_null() {
    let mut config = ServiceConfig::new();
    config.data = serde_json::Value::Null;

    config.set("connection", "primary").unwrap();

    assert_eq!(
        config.get::<String>("connection"),
        Some("primary".to_string())
    );
}

#[test]
fn ServiceConfig___get___returns_none_for_missing_key() {
    let config = ServiceConfig::default();

    let result = config.get::<String>("nonexistent");

    assert!(result.is_none());
}

#[test]
fn ServiceConfig___get___returns_none_for_wrong_type() {
    let mut config = ServiceConfig::new();
    config.set("string_key", "not a number").unwrap();

    let result = config.get::<i32>("string_key");

    assert!(result.is_none());
}

#[test]
fn ServiceMetadata___new___sets_name_and_version() {
    let metadata = ServiceMetadata::new("jrtest", "1.0.0");

    assert_eq!(metadata.name, "jrtest");
    assert_eq!(metadata.version, "1.0.0");
    assert!(metadata.description.is_none());
    assert!(metadata.authors.is_empty());
    assert!(metadata.route_prefix.is_none());
}

#[test]
fn ServiceMetadata___with_route_prefix___sets_prefix() {
    let metadata = ServiceMetadata::new("jrtest", "1.0.0").with_route_prefix("jrtest/v1");

    assert_eq!(metadata.route_prefix.as_deref(), Some("jrtest/v1"));
}
