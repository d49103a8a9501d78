//! jrtest-host - Hosting layer for jrtest service modules
//!
//! This crate sits between the platform transport and a [`ServiceModule`]:
//! - [`ServiceHandle`] drives the module lifecycle and dispatches requests
//! - [`ServiceHandleManager`] keeps registered handles by id
//! - [`catch_panic`] keeps a panicking module from taking the host down
//!
//! # Dispatch
//!
//! [`ServiceHandle::dispatch`] never fails: module results become a `200`
//! [`WireResponse`] carrying the result envelope, typed failures become a
//! fault body with the error's status code.

mod handle;
mod panic_guard;

pub use handle::{ServiceHandle, ServiceHandleManager};
pub use panic_guard::{catch_panic, install_panic_hook};

pub use jrtest_core::{LogLevel, ModuleState, ServiceConfig, ServiceError, ServiceModule};
pub use jrtest_runtime::{AsyncBridge, AsyncRuntime, RuntimeConfig};
pub use jrtest_transport::{RequestEnvelope, WireResponse};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{ServiceHandle, ServiceHandleManager};
    pub use jrtest_core::prelude::*;
    pub use jrtest_logging::prelude::*;
    pub use jrtest_runtime::prelude::*;
    pub use jrtest_transport::prelude::*;
}
