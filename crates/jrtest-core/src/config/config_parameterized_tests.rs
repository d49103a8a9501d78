#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

// ============================================================================
// Host settings
// ============================================================================

#[test_case(r#"{"log_level": "info"}"#, "info")]
#[test_case(r#"{"log_level": "debug"}"#, "debug")]
#[test_case(r#"{"log_level": "trace"}"#, "trace")]
fn ServiceConfig___log_level_json___parses_correctly(json: &str, expected_level: &str) {
    let config = ServiceConfig::from_json(json.as_bytes()).unwrap();
    assert_eq!(config.log_level, expected_level);
}

#[test_case(r#"{"max_concurrent_ops": 10}"#, 10)]
#[test_case(r#"{"max_concurrent_ops": 0}"#, 0)]
#[test_case(r#"{}"#, 1000)]
fn ServiceConfig___max_concurrent_ops_json___parses_correctly(json: &str, expected_ops: usize) {
    let config = ServiceConfig::from_json(json.as_bytes()).unwrap();
    assert_eq!(config.max_concurrent_ops, expected_ops);
}

#[test_case(r#"{"request_timeout_ms": 250}"#, Some(250))]
#[test_case(r#"{"request_timeout_ms": null}"#, None)]
#[test_case(r#"{}"#, None)]
fn ServiceConfig___request_timeout_json___parses_correctly(json: &str, expected: Option<u64>) {
    let config = ServiceConfig::from_json(json.as_bytes()).unwrap();
    assert_eq!(config.request_timeout_ms, expected);
}

#[test_case(r#"{"diagnostic_mode": true}"#, true)]
#[test_case(r#"{"diagnostic_mode": false}"#, false)]
#[test_case(r#"{}"#, false)]
fn ServiceConfig___diagnostic_mode_json___parses_correctly(json: &str, expected: bool) {
    let config = ServiceConfig::from_json(json.as_bytes()).unwrap();
    assert_eq!(config.diagnostic_mode, expected);
}

// ============================================================================
// Reporting settings
// ============================================================================

#[test_case(r#"{"search": {"default_limit": 25}}"#, 25, 50)]
#[test_case(r#"{"search": {"max_query_len": 80}}"#, 10, 80)]
#[test_case(r#"{"search": {}}"#, 10, 50)]
fn SearchSettings___json___parses_with_defaults(json: &str, limit: i32, max_len: usize) {
    let config = ServiceConfig::from_json(json.as_bytes()).unwrap();

    assert_eq!(config.search.default_limit, limit);
    assert_eq!(config.search.max_query_len, max_len);
}

#[test_case(r#"{"pivot": {"maximum_columns": 3}}"#, 3, 30)]
#[test_case(r#"{"pivot": {"timeout_secs": 5}}"#, 10, 5)]
fn PivotSettings___json___parses_with_defaults(json: &str, columns: u32, timeout: u32) {
    let config = ServiceConfig::from_json(json.as_bytes()).unwrap();

    assert_eq!(config.pivot.maximum_columns, columns);
    assert_eq!(config.pivot.timeout_secs, timeout);
    assert_eq!(config.pivot.group_by, "Timestamp");
}

// ============================================================================
// Free-form data access
// ============================================================================

#[test_case("string_key", "string_value")]
#[test_case("key_with_numbers", "123abc")]
fn ServiceConfig___set_and_get_string___roundtrips_correctly(key: &str, value: &str) {
    let mut config = ServiceConfig::new();

    config.set(key, value).unwrap();

    assert_eq!(config.get::<String>(key), Some(value.to_string()));
}
