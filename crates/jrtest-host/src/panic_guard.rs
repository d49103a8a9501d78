//! Panic containment around module code
//!
//! A panicking handler must not unwind into the host. The panic is turned
//! into [`ServiceError::Internal`] and the owning handle is marked faulted.

use crate::handle::ServiceHandle;
use jrtest_core::{ServiceError, ServiceResult};
use std::any::Any;
use std::panic;

/// Run `f`, converting a panic into [`ServiceError::Internal`].
///
/// When `handle` is given it is moved to `Faulted` on panic.
pub fn catch_panic<F, R>(handle: Option<&ServiceHandle>, f: F) -> ServiceResult<R>
where
    F: FnOnce() -> R + panic::UnwindSafe,
{
    panic::catch_unwind(f).map_err(|payload| {
        let message = panic_to_string(&payload);
        tracing::error!(panic = %message, "Service module panicked");

        if let Some(handle) = handle {
            handle.mark_faulted();
        }

        ServiceError::Internal(message)
    })
}

fn panic_to_string(payload: &Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("service module panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("service module panicked: {}", s)
    } else {
        "service module panicked with unknown payload".to_string()
    }
}

/// Route panic reports through tracing so the host logger sees them.
///
/// Replaces the process-wide panic hook.
pub fn install_panic_hook() {
    panic::set_hook(Box::new(|info| {
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
            .unwrap_or("unknown");

        match info.location() {
            Some(location) => tracing::error!(
                file = location.file(),
                line = location.line(),
                column = location.column(),
                payload,
                "Panic"
            ),
            None => tracing::error!(payload, "Panic at unknown location"),
        }
    }));
}

#[cfg(test)]
#[path = "panic_guard/panic_guard_tests.rs"]
mod panic_guard_tests;
