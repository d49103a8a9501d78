//! jrtest-runtime - Tokio runtime integration
//!
//! This crate provides:
//! - [`AsyncRuntime`] owning the multi-thread Tokio runtime and the root cancel handle
//! - [`AsyncBridge`] for running async handlers from the host's synchronous calls

mod bridge;
mod runtime;

pub use bridge::AsyncBridge;
pub use runtime::{AsyncRuntime, RuntimeConfig};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{AsyncBridge, AsyncRuntime, RuntimeConfig};
}
