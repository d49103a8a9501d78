//! # jrtest
//!
//! Workspace audit reporting service behind a uniform result envelope.
//!
//! The service answers workspace lookups and searches, lists installed
//! applications, reads audit metrics and the latest audit record, and
//! produces reviewer statistics, reviewer choices and an audit pivot. Every
//! reporting operation answers with a [`ResultEnvelope`]; lookups and
//! searches raise typed [`ServiceError`]s instead.
//!
//! ## Hosting the service
//!
//! ```ignore
//! use jrtest::prelude::*;
//! use std::sync::Arc;
//!
//! let backend = Arc::new(FixtureBackend::new(FixtureData::from_json(data)?));
//! let deps = ServiceDependencies::new(backend.clone(), backend);
//! let handle = jrtest::start_service(deps, ServiceConfig::default())?;
//!
//! let request = Route::resolve(HttpMethod::Get, "/JRTestService/workspace/1003")?
//!     .into_request(serde_json::Value::Null)?;
//! let response = handle.dispatch(&request);
//! ```
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports from:
//! - [`jrtest_core`] - Errors, envelope, configuration and the module trait
//! - [`jrtest_transport`] - Route table, request framing and wire responses
//! - [`jrtest_runtime`] - Tokio runtime and the sync/async bridge
//! - [`jrtest_logging`] - Tracing setup and host log sinks
//! - [`jrtest_host`] - Module lifecycle and request dispatch
//! - [`jrtest_service`] - The JRTestService operations and their ports

// Re-export core types
pub use jrtest_core::{
    CancelHandle, CancelSignal, Clock, ExecutionIdentity, FaultSafeInfo, FixedClock, LogLevel,
    ModuleState, RequestContext, ResultEnvelope, ServiceConfig, ServiceContext, ServiceError,
    ServiceMetadata, ServiceModule, ServiceResult, SystemClock, WorkspaceId,
};

// Re-export transport types
pub use jrtest_transport::{FaultBody, HttpMethod, RequestEnvelope, Route, WireResponse};

// Re-export hosting
pub use jrtest_host::{ServiceHandle, ServiceHandleManager, install_panic_hook};
pub use jrtest_logging::{init_console_logging, init_logging};

// Re-export the service
pub use jrtest_service::{
    FixtureBackend, FixtureData, JrTestService, ProxyFactory, QueryExecutor, ServiceDependencies,
};

// Re-export common dependencies that module authors need
pub use async_trait::async_trait;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tracing;

/// Build the service over `deps`, wrap it in a host handle and start it
pub fn start_service(
    deps: ServiceDependencies,
    config: ServiceConfig,
) -> ServiceResult<ServiceHandle> {
    let handle = ServiceHandle::new(Box::new(JrTestService::new(deps)), config)?;
    handle.start()?;
    Ok(handle)
}

/// Prelude module for convenient imports.
///
/// Use `use jrtest::prelude::*;` to import commonly used types.
pub mod prelude {
    pub use crate::{
        CancelSignal, FixtureBackend, FixtureData, HttpMethod, JrTestService, ResultEnvelope,
        Route, ServiceConfig, ServiceDependencies, ServiceError, ServiceHandle, ServiceResult,
        WorkspaceId, async_trait,
    };

    pub use serde::{Deserialize, Serialize};
}
