//! Tokio runtime management

use jrtest_core::{CancelHandle, CancelSignal, ServiceConfig, ServiceError, ServiceResult};
use tokio::runtime::{Builder, Runtime};

/// Configuration for the async runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Number of worker threads (None = number of CPU cores)
    pub worker_threads: Option<usize>,
    /// Name prefix for worker threads
    pub thread_name: String,
    pub max_blocking_threads: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            thread_name: "jrtest-worker".to_string(),
            max_blocking_threads: 512,
        }
    }
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runtime settings carried by the module configuration
    pub fn from_service_config(config: &ServiceConfig) -> Self {
        Self {
            worker_threads: config.worker_threads,
            ..Self::default()
        }
    }

    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self
    }

    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}

/// Tokio runtime hosting one service module
///
/// Every request signal derives from the root [`CancelHandle`], which fires
/// on [`shutdown`](Self::shutdown) and on drop.
pub struct AsyncRuntime {
    runtime: Runtime,
    root_cancel: CancelHandle,
    config: RuntimeConfig,
}

impl AsyncRuntime {
    pub fn new(config: RuntimeConfig) -> ServiceResult<Self> {
        let mut builder = Builder::new_multi_thread();

        if let Some(threads) = config.worker_threads {
            builder.worker_threads(threads);
        }

        let runtime = builder
            .thread_name(&config.thread_name)
            .max_blocking_threads(config.max_blocking_threads)
            .enable_all()
            .build()
            .map_err(|e| ServiceError::Runtime(format!("failed to create runtime: {}", e)))?;

        Ok(Self {
            runtime,
            root_cancel: CancelHandle::new(),
            config,
        })
    }

    pub fn with_defaults() -> ServiceResult<Self> {
        Self::new(RuntimeConfig::default())
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn handle(&self) -> tokio::runtime::Handle {
        self.runtime.handle().clone()
    }

    /// Signal that fires when the runtime shuts down
    pub fn cancel_signal(&self) -> CancelSignal {
        self.root_cancel.signal()
    }

    /// Block on a future from a synchronous caller
    pub fn block_on<F>(&self, future: F) -> F::Output
    where
        F: std::future::Future,
    {
        self.runtime.block_on(future)
    }

    pub fn spawn<F>(&self, future: F) -> tokio::task::JoinHandle<F::Output>
    where
        F: std::future::Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.runtime.spawn(future)
    }

    pub fn spawn_blocking<F, R>(&self, func: F) -> tokio::task::JoinHandle<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        self.runtime.spawn_blocking(func)
    }

    /// Cancel every outstanding request signal. Idempotent.
    pub fn shutdown(&self) {
        if !self.root_cancel.is_cancelled() {
            tracing::info!(thread_name = %self.config.thread_name, "Cancelling runtime work");
        }
        self.root_cancel.cancel();
    }

    pub fn is_shutting_down(&self) -> bool {
        self.root_cancel.is_cancelled()
    }
}

impl Drop for AsyncRuntime {
    fn drop(&mut self) {
        self.root_cancel.cancel();
    }
}

#[cfg(test)]
#[path = "runtime/runtime_tests.rs"]
mod runtime_tests;
