//! Service handle management

use crate::panic_guard::catch_panic;
use dashmap::DashMap;
use jrtest_core::{
    LogLevel, ModuleState, RequestContext, ServiceConfig, ServiceContext, ServiceError,
    ServiceMetadata, ServiceModule, ServiceResult, run_cancellable,
};
use jrtest_logging::{LogSinkManager, ReloadHandle};
use jrtest_runtime::{AsyncBridge, AsyncRuntime, RuntimeConfig};
use jrtest_transport::{RequestEnvelope, WireResponse};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

static HANDLE_MANAGER: OnceCell<ServiceHandleManager> = OnceCell::new();

/// Registry of live service handles
pub struct ServiceHandleManager {
    handles: DashMap<u64, Arc<ServiceHandle>>,
    next_id: AtomicU64,
}

impl ServiceHandleManager {
    pub fn new() -> Self {
        Self {
            handles: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn global() -> &'static ServiceHandleManager {
        HANDLE_MANAGER.get_or_init(ServiceHandleManager::new)
    }

    /// Register a handle and assign its id
    pub fn register(&self, handle: ServiceHandle) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        handle.set_id(id);
        self.handles.insert(id, Arc::new(handle));
        id
    }

    pub fn get(&self, id: u64) -> Option<Arc<ServiceHandle>> {
        self.handles.get(&id).map(|r| r.clone())
    }

    pub fn remove(&self, id: u64) -> Option<Arc<ServiceHandle>> {
        self.handles.remove(&id).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Shut down and unregister every handle
    pub fn shutdown_all(&self, timeout_ms: u64) {
        let ids: Vec<u64> = self.handles.iter().map(|entry| *entry.key()).collect();
        for id in ids {
            if let Some(handle) = self.remove(id) {
                if let Err(e) = handle.shutdown(timeout_ms) {
                    tracing::warn!(handle_id = id, error = %e, "Service shutdown failed");
                }
            }
        }
    }
}

impl Default for ServiceHandleManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Decrements the in-flight counter on every exit path
struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// One hosted service module with its runtime
pub struct ServiceHandle {
    module: Box<dyn ServiceModule>,
    context: ServiceContext,
    bridge: RwLock<Arc<AsyncBridge>>,
    in_flight: AtomicUsize,
    rejected: AtomicU64,
    id: RwLock<Option<u64>>,
}

impl ServiceHandle {
    pub fn new(module: Box<dyn ServiceModule>, config: ServiceConfig) -> ServiceResult<Self> {
        let bridge = Self::build_bridge(&config)?;
        Ok(Self {
            module,
            context: ServiceContext::new(config),
            bridge: RwLock::new(bridge),
            in_flight: AtomicUsize::new(0),
            rejected: AtomicU64::new(0),
            id: RwLock::new(None),
        })
    }

    fn build_bridge(config: &ServiceConfig) -> ServiceResult<Arc<AsyncBridge>> {
        let runtime = AsyncRuntime::new(RuntimeConfig::from_service_config(config))?;
        Ok(Arc::new(AsyncBridge::new(Arc::new(runtime))))
    }

    fn bridge(&self) -> Arc<AsyncBridge> {
        self.bridge.read().clone()
    }

    pub fn id(&self) -> Option<u64> {
        *self.id.read()
    }

    pub(crate) fn set_id(&self, id: u64) {
        *self.id.write() = Some(id);
    }

    pub fn state(&self) -> ModuleState {
        self.context.state()
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.context.config
    }

    pub fn metadata(&self) -> Option<ServiceMetadata> {
        self.module.metadata()
    }

    pub fn routes(&self) -> Vec<&'static str> {
        self.module.routes()
    }

    /// Requests currently executing
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Requests refused because the concurrency limit was reached
    pub fn rejected_count(&self) -> u64 {
        self.rejected.load(Ordering::SeqCst)
    }

    /// Start (or restart) the module
    pub fn start(&self) -> ServiceResult<()> {
        self.context.transition_to(ModuleState::Starting)?;

        if self.bridge().is_shutting_down() {
            match Self::build_bridge(&self.context.config) {
                Ok(bridge) => *self.bridge.write() = bridge,
                Err(e) => {
                    self.context.set_state(ModuleState::Faulted);
                    return Err(e);
                }
            }
        }

        let bridge = self.bridge();
        match bridge.call_sync(self.module.on_start(&self.context)) {
            Ok(()) => {
                self.context.transition_to(ModuleState::Serving)?;
                tracing::info!(routes = self.module.routes().len(), "Service module started");
                Ok(())
            }
            Err(e) => {
                self.context.set_state(ModuleState::Faulted);
                tracing::error!(error = %e, "Service module failed to start");
                Err(e)
            }
        }
    }

    /// Run one request with a fresh request id under the caller identity
    pub fn call(&self, route: &str, payload: &[u8]) -> ServiceResult<Vec<u8>> {
        let bridge = self.bridge();
        let request = RequestContext::new(bridge.next_request_id(), route)
            .with_cancel(bridge.cancel_signal());
        self.execute(&bridge, &request, payload)
    }

    fn execute(
        &self,
        bridge: &AsyncBridge,
        request: &RequestContext,
        payload: &[u8],
    ) -> ServiceResult<Vec<u8>> {
        let state = self.context.state();
        if !state.can_serve_requests() {
            return Err(ServiceError::InvalidState {
                expected: ModuleState::Serving.to_string(),
                actual: state.to_string(),
            });
        }

        let limit = self.context.config.max_concurrent_ops;
        let previous = self.in_flight.fetch_add(1, Ordering::SeqCst);
        let _guard = InFlightGuard(&self.in_flight);
        if limit > 0 && previous >= limit {
            self.rejected.fetch_add(1, Ordering::SeqCst);
            tracing::warn!(route = %request.route, limit, "Concurrency limit reached");
            return Err(ServiceError::TooManyRequests);
        }

        let timeout = self.context.config.request_timeout_ms.map(Duration::from_millis);
        let work = self
            .module
            .handle_request(&self.context, request, payload);
        bridge.call_sync_with(run_cancellable(&request.cancel, work), timeout)
    }

    /// Dispatch a framed request; failures are encoded into the response
    pub fn dispatch(&self, envelope: &RequestEnvelope) -> WireResponse {
        let started = Instant::now();
        let bridge = self.bridge();
        let request_id = envelope
            .request_id
            .unwrap_or_else(|| bridge.next_request_id());
        let mut request = RequestContext::new(request_id, envelope.route.clone())
            .with_cancel(bridge.cancel_signal());
        request.correlation_id = envelope.correlation_id.clone();

        let outcome = catch_panic(Some(self), AssertUnwindSafe(|| {
            let payload = envelope.payload_bytes()?;
            let bytes = self.execute(&bridge, &request, &payload)?;
            WireResponse::success_raw(&bytes).map_err(|e| {
                ServiceError::Internal(format!("module returned malformed JSON: {}", e))
            })
        }))
        .and_then(|result| result);

        let response = match outcome {
            Ok(response) => response,
            Err(err) => WireResponse::fault(&err, self.context.config.diagnostic_mode),
        }
        .with_request_id(Some(request_id));

        tracing::debug!(
            route = %envelope.route,
            request_id,
            status = response.transport_status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Request dispatched"
        );
        response
    }

    /// Drain in-flight requests, stop the module and cancel leftover work
    pub fn shutdown(&self, timeout_ms: u64) -> ServiceResult<()> {
        let current = self.context.state();
        if current != ModuleState::Serving {
            if current.is_terminal() {
                return Ok(());
            }
            return Err(ServiceError::InvalidState {
                expected: ModuleState::Serving.to_string(),
                actual: current.to_string(),
            });
        }

        self.context.transition_to(ModuleState::Draining)?;
        let timeout = Duration::from_millis(timeout_ms);
        let bridge = self.bridge();

        let drained = bridge.runtime().block_on(async {
            tokio::time::timeout(timeout, async {
                while self.in_flight.load(Ordering::SeqCst) > 0 {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
            })
            .await
            .is_ok()
        });
        if !drained {
            tracing::warn!(
                in_flight = self.in_flight(),
                timeout_ms,
                "Drain timed out, cancelling outstanding requests"
            );
        }

        let result = bridge.call_sync_timeout(self.module.on_stop(&self.context), timeout);
        bridge.runtime().shutdown();

        match result {
            Ok(()) => {
                self.context.transition_to(ModuleState::Stopped)?;
                tracing::info!("Service module stopped");
                Ok(())
            }
            Err(ServiceError::Timeout) => {
                self.context.set_state(ModuleState::Stopped);
                tracing::warn!(timeout_ms, "Service module stop timed out");
                Ok(())
            }
            Err(e) => {
                self.context.set_state(ModuleState::Faulted);
                tracing::error!(error = %e, "Service module stop failed");
                Err(e)
            }
        }
    }

    pub fn set_log_level(&self, level: LogLevel) {
        LogSinkManager::global().set_level(level);
        if let Err(e) = ReloadHandle::global().reload_level(level) {
            tracing::debug!(error = %e, "Tracing filter not reloaded");
        }
    }

    /// Move to `Faulted` after a panic or unrecoverable error; every later
    /// request is refused
    pub fn mark_faulted(&self) {
        tracing::error!(handle_id = ?self.id(), "Marking service module as faulted");
        self.context.set_state(ModuleState::Faulted);
    }
}

#[cfg(test)]
#[path = "handle/handle_tests.rs"]
mod handle_tests;
