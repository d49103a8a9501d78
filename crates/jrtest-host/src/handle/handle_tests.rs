#![allow(non_snake_case)]

use super::*;
use async_trait::async_trait;
use jrtest_core::{Clock, FaultSafeInfo, SystemClock};
use std::sync::atomic::AtomicBool;

/// Module answering a handful of behaviours by route tag
struct ScriptedModule {
    fail_start: bool,
    stopped: Arc<AtomicBool>,
}

impl ScriptedModule {
    fn new() -> Self {
        Self {
            fail_start: false,
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait]
impl ServiceModule for ScriptedModule {
    async fn on_start(&self, _ctx: &ServiceContext) -> ServiceResult<()> {
        if self.fail_start {
            return Err(ServiceError::Config("missing connection".into()));
        }
        Ok(())
    }

    async fn handle_request(
        &self,
        _ctx: &ServiceContext,
        request: &RequestContext,
        payload: &[u8],
    ) -> ServiceResult<Vec<u8>> {
        match request.route.as_str() {
            "echo" => Ok(payload.to_vec()),
            "envelope" => Ok(br#"{"payload":[],"succeeded":false,"message":"GetWorkspaceAudit Failed","status_code":500}"#.to_vec()),
            "missing" => Err(ServiceError::not_found_with(
                "Workspace 9 not found.",
                FaultSafeInfo::new("Workspace 9", SystemClock.now()),
            )),
            "slow" => {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(b"null".to_vec())
            }
            "garbage" => Ok(b"not json".to_vec()),
            "panic" => panic!("handler exploded"),
            other => Err(ServiceError::UnknownRoute(other.to_string())),
        }
    }

    async fn on_stop(&self, _ctx: &ServiceContext) -> ServiceResult<()> {
        self.stopped.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn routes(&self) -> Vec<&'static str> {
        vec!["echo", "envelope", "missing", "slow", "garbage", "panic"]
    }
}

fn started_handle(config: ServiceConfig) -> ServiceHandle {
    let handle = ServiceHandle::new(Box::new(ScriptedModule::new()), config).unwrap();
    handle.start().unwrap();
    handle
}

// Lifecycle

#[test]
fn ServiceHandle___new___registered() {
    let handle =
        ServiceHandle::new(Box::new(ScriptedModule::new()), ServiceConfig::default()).unwrap();

    assert_eq!(handle.state(), ModuleState::Registered);
    assert!(handle.id().is_none());
}

#[test]
fn ServiceHandle___start___serving() {
    let handle = started_handle(ServiceConfig::default());

    assert_eq!(handle.state(), ModuleState::Serving);
    assert_eq!(handle.routes().len(), 6);
}

#[test]
fn ServiceHandle___start_failure___faulted() {
    let module = ScriptedModule {
        fail_start: true,
        ..ScriptedModule::new()
    };
    let handle = ServiceHandle::new(Box::new(module), ServiceConfig::default()).unwrap();

    let result = handle.start();

    assert!(matches!(result, Err(ServiceError::Config(_))));
    assert_eq!(handle.state(), ModuleState::Faulted);
}

#[test]
fn ServiceHandle___call_before_start___invalid_state() {
    let handle =
        ServiceHandle::new(Box::new(ScriptedModule::new()), ServiceConfig::default()).unwrap();

    let result = handle.call("echo", b"{}");

    assert!(matches!(result, Err(ServiceError::InvalidState { .. })));
}

#[test]
fn ServiceHandle___shutdown___stops_module() {
    let module = ScriptedModule::new();
    let stopped = module.stopped.clone();
    let handle = ServiceHandle::new(Box::new(module), ServiceConfig::default()).unwrap();
    handle.start().unwrap();

    handle.shutdown(1000).unwrap();

    assert_eq!(handle.state(), ModuleState::Stopped);
    assert!(stopped.load(Ordering::SeqCst));
}

#[test]
fn ServiceHandle___shutdown_twice___ok() {
    let handle = started_handle(ServiceConfig::default());
    handle.shutdown(1000).unwrap();

    let result = handle.shutdown(1000);

    assert!(result.is_ok());
}

#[test]
fn ServiceHandle___restart_after_shutdown___serves_again() {
    let handle = started_handle(ServiceConfig::default());
    handle.shutdown(1000).unwrap();

    handle.start().unwrap();
    let result = handle.call("echo", b"[1]");

    assert_eq!(result.unwrap(), b"[1]".to_vec());
}

// Calls

#[test]
fn ServiceHandle___call___returns_module_bytes() {
    let handle = started_handle(ServiceConfig::default());

    let result = handle.call("echo", br#"{"workspace_id":1}"#);

    assert_eq!(result.unwrap(), br#"{"workspace_id":1}"#.to_vec());
}

#[test]
fn ServiceHandle___call_with_timeout___times_out() {
    let config = ServiceConfig {
        request_timeout_ms: Some(20),
        ..ServiceConfig::default()
    };
    let handle = started_handle(config);

    let result = handle.call("slow", b"null");

    assert!(matches!(result, Err(ServiceError::Timeout)));
    assert_eq!(handle.in_flight(), 0);
}

// Dispatch

#[test]
fn ServiceHandle___dispatch_envelope_failure___transport_200() {
    let handle = started_handle(ServiceConfig::default());
    let request = RequestEnvelope::new("envelope", serde_json::Value::Null).with_request_id(41);

    let response = handle.dispatch(&request);

    assert_eq!(response.transport_status, 200);
    assert_eq!(response.request_id, Some(41));
    assert_eq!(response.body["succeeded"], false);
    assert_eq!(response.body["status_code"], 500);
}

#[test]
fn ServiceHandle___dispatch_not_found___fault_404_without_diagnostics() {
    let handle = started_handle(ServiceConfig::default());

    let response = handle.dispatch(&RequestEnvelope::new("missing", serde_json::Value::Null));

    assert_eq!(response.transport_status, 404);
    let fault = response.fault_body().unwrap();
    assert_eq!(fault.message, "Workspace 9 not found.");
    assert!(fault.type_identifier.is_some());
    assert!(fault.fault_safe.is_none());
}

#[test]
fn ServiceHandle___dispatch_not_found_diagnostic___includes_fault_safe() {
    let config = ServiceConfig {
        diagnostic_mode: true,
        ..ServiceConfig::default()
    };
    let handle = started_handle(config);

    let response = handle.dispatch(&RequestEnvelope::new("missing", serde_json::Value::Null));

    let fault = response.fault_body().unwrap();
    assert_eq!(fault.fault_safe.unwrap().information, "Workspace 9");
}

#[test]
fn ServiceHandle___dispatch_unknown_route___fault_404() {
    let handle = started_handle(ServiceConfig::default());

    let response = handle.dispatch(&RequestEnvelope::new("nope", serde_json::Value::Null));

    assert_eq!(response.transport_status, 404);
    assert_eq!(response.fault_body().unwrap().error_type, "UnknownRoute");
}

#[test]
fn ServiceHandle___dispatch_malformed_module_output___fault_500() {
    let handle = started_handle(ServiceConfig::default());

    let response = handle.dispatch(&RequestEnvelope::new("garbage", serde_json::Value::Null));

    assert_eq!(response.transport_status, 500);
    assert_eq!(response.fault_body().unwrap().error_type, "Internal");
}

#[test]
fn ServiceHandle___dispatch_panic___faults_module() {
    let handle = started_handle(ServiceConfig::default());

    let response = handle.dispatch(&RequestEnvelope::new("panic", serde_json::Value::Null));

    assert_eq!(response.transport_status, 500);
    assert_eq!(handle.state(), ModuleState::Faulted);
    let next = handle.dispatch(&RequestEnvelope::new("echo", serde_json::Value::Null));
    assert_eq!(next.transport_status, 503);
}

#[test]
fn ServiceHandle___mark_faulted___rejects_requests() {
    let handle = started_handle(ServiceConfig::default());

    handle.mark_faulted();

    assert!(matches!(
        handle.call("echo", b"{}"),
        Err(ServiceError::InvalidState { .. })
    ));
}

// ServiceHandleManager

#[test]
fn ServiceHandleManager___register___assigns_id() {
    let manager = ServiceHandleManager::new();
    let handle =
        ServiceHandle::new(Box::new(ScriptedModule::new()), ServiceConfig::default()).unwrap();

    let id = manager.register(handle);

    assert_eq!(manager.get(id).unwrap().id(), Some(id));
    assert_eq!(manager.len(), 1);
}

#[test]
fn ServiceHandleManager___remove___returns_handle() {
    let manager = ServiceHandleManager::new();
    let id = manager.register(
        ServiceHandle::new(Box::new(ScriptedModule::new()), ServiceConfig::default()).unwrap(),
    );

    let removed = manager.remove(id);

    assert!(removed.is_some());
    assert!(manager.get(id).is_none());
    assert!(manager.is_empty());
}

#[test]
fn ServiceHandleManager___shutdown_all___stops_and_clears() {
    let manager = ServiceHandleManager::new();
    let handle = started_handle(ServiceConfig::default());
    let id = manager.register(handle);
    let kept = manager.get(id).unwrap();

    manager.shutdown_all(1000);

    assert!(manager.is_empty());
    assert_eq!(kept.state(), ModuleState::Stopped);
}
