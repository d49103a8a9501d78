#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

// ============================================================================
// Route tags
// ============================================================================

#[test]
fn Route___from_tag___inverts_tag() {
    for route in Route::ALL {
        assert_eq!(Route::from_tag(route.tag()), Some(route));
    }
}

#[test]
fn Route___from_tag_unknown___returns_none() {
    assert_eq!(Route::from_tag("workspace.delete"), None);
}

// ============================================================================
// Resolution
// ============================================================================

#[test_case(HttpMethod::Get, "workspace/1015024", Route::WorkspaceGet)]
#[test_case(HttpMethod::Post, "workspace?limit=2", Route::WorkspaceSearch)]
#[test_case(HttpMethod::Get, "application", Route::ApplicationList)]
#[test_case(HttpMethod::Get, "audit/1015024", Route::AuditMetrics)]
#[test_case(HttpMethod::Get, "audit/query/1015024", Route::AuditLatestId)]
#[test_case(HttpMethod::Get, "audit/time/1015024", Route::AuditLatestTime)]
#[test_case(HttpMethod::Post, "reviewer/statistics", Route::ReviewerStatistics)]
#[test_case(HttpMethod::Post, "reviewer/choices", Route::ReviewerChoices)]
#[test_case(HttpMethod::Get, "audit/pivot/1015024", Route::AuditPivot)]
fn Route___resolve___matches_table(method: HttpMethod, path: &str, expected: Route) {
    let resolved = Route::resolve(method, path).unwrap();

    assert_eq!(resolved.route, expected);
}

#[test]
fn Route___resolve_with_prefix___strips_prefix() {
    let resolved = Route::resolve(HttpMethod::Get, "/JRTestService/workspace/42").unwrap();

    assert_eq!(resolved.route, Route::WorkspaceGet);
    assert_eq!(resolved.params["workspace_id"], 42);
}

#[test]
fn Route___resolve_query___parses_limit() {
    let resolved = Route::resolve(HttpMethod::Post, "workspace?limit=2&debug=1").unwrap();

    assert_eq!(resolved.params["limit"], 2);
    assert!(!resolved.params.contains_key("debug"));
}

#[test_case(HttpMethod::Get, "workspace/abc" ; "non integer id")]
#[test_case(HttpMethod::Post, "workspace/1" ; "wrong method")]
#[test_case(HttpMethod::Get, "audit/query" ; "missing id")]
#[test_case(HttpMethod::Get, "nope" ; "unknown path")]
fn Route___resolve_unmatched___unknown_route(method: HttpMethod, path: &str) {
    let result = Route::resolve(method, path);

    assert!(matches!(result, Err(ServiceError::UnknownRoute(_))));
}

#[test]
fn Route___resolve_bad_limit___validation_error() {
    let result = Route::resolve(HttpMethod::Post, "workspace?limit=ten");

    assert!(matches!(result, Err(ServiceError::Validation(_))));
}

// ============================================================================
// Request building
// ============================================================================

#[test]
fn ResolvedRoute___into_request___merges_params_into_body() {
    let resolved = Route::resolve(HttpMethod::Post, "workspace?limit=2").unwrap();

    let request = resolved
        .into_request(serde_json::json!({"query_string": "a", "limit": 99}))
        .unwrap();

    assert_eq!(request.route, "workspace.search");
    assert_eq!(request.payload["query_string"], "a");
    assert_eq!(request.payload["limit"], 2);
}

#[test]
fn ResolvedRoute___into_request_null_body___uses_params() {
    let resolved = Route::resolve(HttpMethod::Get, "audit/7").unwrap();

    let request = resolved.into_request(serde_json::Value::Null).unwrap();

    assert_eq!(request.payload, serde_json::json!({"workspace_id": 7}));
}

#[test]
fn ResolvedRoute___into_request_no_params___keeps_null() {
    let resolved = Route::resolve(HttpMethod::Get, "application").unwrap();

    let request = resolved.into_request(serde_json::Value::Null).unwrap();

    assert!(request.payload.is_null());
}

#[test]
fn ResolvedRoute___into_request_scalar_body_with_params___validation_error() {
    let resolved = Route::resolve(HttpMethod::Get, "audit/7").unwrap();

    let result = resolved.into_request(serde_json::json!("text"));

    assert!(matches!(result, Err(ServiceError::Validation(_))));
}

#[test]
fn HttpMethod___parse___case_insensitive() {
    assert_eq!(HttpMethod::parse("post"), Some(HttpMethod::Post));
    assert_eq!(HttpMethod::parse("DELETE"), None);
}
