//! Bridge between the host's synchronous calls and async handlers

use crate::AsyncRuntime;
use jrtest_core::{CancelSignal, ServiceError, ServiceResult};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Runs async operations to completion on behalf of a blocking caller
pub struct AsyncBridge {
    runtime: Arc<AsyncRuntime>,
    request_counter: AtomicU64,
}

impl AsyncBridge {
    pub fn new(runtime: Arc<AsyncRuntime>) -> Self {
        Self {
            runtime,
            request_counter: AtomicU64::new(1),
        }
    }

    /// Next request id; ids start at 1
    pub fn next_request_id(&self) -> u64 {
        self.request_counter.fetch_add(1, Ordering::SeqCst)
    }

    /// Block until `future` completes
    pub fn call_sync<F, T>(&self, future: F) -> ServiceResult<T>
    where
        F: Future<Output = ServiceResult<T>>,
    {
        if self.runtime.is_shutting_down() {
            return Err(ServiceError::Runtime("runtime is shutting down".to_string()));
        }
        self.runtime.block_on(future)
    }

    /// Block until `future` completes or `timeout` elapses
    pub fn call_sync_timeout<F, T>(&self, future: F, timeout: Duration) -> ServiceResult<T>
    where
        F: Future<Output = ServiceResult<T>>,
    {
        self.call_sync(async move {
            match tokio::time::timeout(timeout, future).await {
                Ok(result) => result,
                Err(_) => Err(ServiceError::Timeout),
            }
        })
    }

    /// [`call_sync_timeout`](Self::call_sync_timeout) when a timeout is set,
    /// [`call_sync`](Self::call_sync) otherwise
    pub fn call_sync_with<F, T>(&self, future: F, timeout: Option<Duration>) -> ServiceResult<T>
    where
        F: Future<Output = ServiceResult<T>>,
    {
        match timeout {
            Some(timeout) => self.call_sync_timeout(future, timeout),
            None => self.call_sync(future),
        }
    }

    pub fn spawn<F, T>(&self, future: F) -> tokio::task::JoinHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        self.runtime.spawn(future)
    }

    pub fn runtime(&self) -> &Arc<AsyncRuntime> {
        &self.runtime
    }

    pub fn cancel_signal(&self) -> CancelSignal {
        self.runtime.cancel_signal()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.runtime.is_shutting_down()
    }
}
