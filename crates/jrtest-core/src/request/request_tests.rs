#![allow(non_snake_case)]

use super::*;
use crate::cancel::CancelHandle;

// RequestContext tests

#[test]
fn RequestContext___new___sets_request_id_and_route() {
    let ctx = RequestContext::new(123, "workspace.get");

    assert_eq!(ctx.request_id, 123);
    assert_eq!(ctx.route, "workspace.get");
    assert!(ctx.correlation_id.is_none());
    assert_eq!(ctx.identity, ExecutionIdentity::CurrentUser);
    assert!(!ctx.cancel.is_cancelled());
}

#[test]
fn RequestContext___with_correlation_id___sets_correlation_id() {
    let ctx = RequestContext::new(123, "workspace.get").with_correlation_id("corr-456");

    assert_eq!(ctx.correlation_id, Some("corr-456".to_string()));
}

#[test]
fn RequestContext___with_cancel___observes_handle() {
    let handle = CancelHandle::new();
    let ctx = RequestContext::new(1, "audit.metrics").with_cancel(handle.signal());

    handle.cancel();

    assert!(ctx.cancel.is_cancelled());
}

#[test]
fn RequestContext___with_identity___overrides_default() {
    let ctx =
        RequestContext::new(1, "reviewer.statistics").with_identity(ExecutionIdentity::System);

    assert_eq!(ctx.identity, ExecutionIdentity::System);
}

// WorkspaceId tests

#[test]
fn WorkspaceId___admin___is_minus_one() {
    assert_eq!(WorkspaceId::ADMIN.get(), -1);
    assert!(WorkspaceId::ADMIN.is_admin());
    assert!(!WorkspaceId(1015024).is_admin());
}

#[test]
fn WorkspaceId___serialize___transparent_integer() {
    let json = serde_json::to_string(&WorkspaceId(1015024)).unwrap();

    assert_eq!(json, "1015024");
}

#[test]
fn WorkspaceId___display___plain_number() {
    assert_eq!(WorkspaceId(42).to_string(), "42");
}

// ExecutionIdentity tests

#[test]
fn ExecutionIdentity___serialize___snake_case() {
    let json = serde_json::to_string(&ExecutionIdentity::CurrentUser).unwrap();

    assert_eq!(json, "\"current_user\"");
}
