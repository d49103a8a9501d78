//! Property-based tests for transport framing and routing

use jrtest_core::ServiceError;
use jrtest_transport::{FaultBody, HttpMethod, RequestEnvelope, Route, WireResponse};
use proptest::prelude::*;

// Strategy: simple JSON values (kept small for test speed)
fn arb_json_value() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::Bool),
        any::<i32>().prop_map(|i| serde_json::Value::Number(i.into())),
        ".*".prop_map(serde_json::Value::String),
    ]
}

fn arb_route() -> impl Strategy<Value = Route> {
    prop::sample::select(Route::ALL.to_vec())
}

fn arb_typed_error() -> impl Strategy<Value = ServiceError> {
    prop_oneof![
        ".*".prop_map(ServiceError::Validation),
        ".*".prop_map(ServiceError::not_found),
        ".*".prop_map(ServiceError::UnknownRoute),
        Just(ServiceError::TooManyRequests),
        Just(ServiceError::Cancelled),
        Just(ServiceError::Timeout),
    ]
}

proptest! {
    /// Property: RequestEnvelope survives a bytes round trip
    #[test]
    fn proptest_request_envelope_roundtrip(
        route in arb_route(),
        payload in arb_json_value(),
        request_id in any::<Option<u64>>(),
    ) {
        let mut envelope = RequestEnvelope::new(route.tag(), payload.clone());
        if let Some(id) = request_id {
            envelope = envelope.with_request_id(id);
        }

        let recovered = RequestEnvelope::from_bytes(&envelope.to_bytes().unwrap()).unwrap();

        prop_assert_eq!(recovered.route, route.tag());
        prop_assert_eq!(recovered.payload, payload);
        prop_assert_eq!(recovered.request_id, request_id);
    }

    /// Property: a fault's transport status always equals its body status
    #[test]
    fn proptest_fault_status_matches_body(err in arb_typed_error(), diagnostic in any::<bool>()) {
        let response = WireResponse::fault(&err, diagnostic);

        let fault: FaultBody = response.fault_body().unwrap();

        prop_assert_eq!(response.transport_status, fault.status_code);
        prop_assert_eq!(fault.code, err.error_code());
        prop_assert!(!response.is_success());
    }

    /// Property: every route resolves from its own method and template
    #[test]
    fn proptest_route_resolves_own_template(route in arb_route(), id in 1..i32::MAX) {
        let path = route.path_template().replace("{workspace_id}", &id.to_string());

        let resolved = Route::resolve(route.method(), &path).unwrap();

        prop_assert_eq!(resolved.route, route);
        if route.path_template().contains("{workspace_id}") {
            prop_assert_eq!(&resolved.params["workspace_id"], &serde_json::json!(id));
        }
    }

    /// Property: GET never resolves a POST-only route
    #[test]
    fn proptest_get_never_resolves_post_route(route in arb_route()) {
        prop_assume!(route.method() == HttpMethod::Post);

        let result = Route::resolve(HttpMethod::Get, route.path_template());

        prop_assert!(result.is_err());
    }
}
