//! Service module trait and its host-owned context

use crate::{
    ModuleState, RequestContext, ServiceConfig, ServiceError, ServiceMetadata, ServiceResult,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU8, Ordering};

/// Context the host owns and hands to every module callback
pub struct ServiceContext {
    pub config: ServiceConfig,
    state: AtomicU8,
}

impl ServiceContext {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            state: AtomicU8::new(ModuleState::Registered.as_u8()),
        }
    }

    pub fn state(&self) -> ModuleState {
        ModuleState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Set the state without validating the transition.
    ///
    /// Reserved for fault handling, where the usual transitions don't apply.
    pub fn set_state(&self, state: ModuleState) {
        self.state.store(state.as_u8(), Ordering::SeqCst);
    }

    /// Move to `target` if the current state allows it
    pub fn transition_to(&self, target: ModuleState) -> ServiceResult<()> {
        let current = self.state();
        if current.can_transition_to(target) {
            self.set_state(target);
            Ok(())
        } else {
            Err(ServiceError::InvalidState {
                expected: format!("state that can transition to {}", target),
                actual: current.to_string(),
            })
        }
    }
}

/// A module hosted behind the jrtest envelope protocol
///
/// Async methods run on the host's Tokio runtime.
///
/// # Example
///
/// ```ignore
/// use jrtest_core::prelude::*;
///
/// struct Echo;
///
/// #[async_trait::async_trait]
/// impl ServiceModule for Echo {
///     async fn on_start(&self, _ctx: &ServiceContext) -> ServiceResult<()> {
///         Ok(())
///     }
///
///     async fn handle_request(
///         &self,
///         _ctx: &ServiceContext,
///         request: &RequestContext,
///         payload: &[u8],
///     ) -> ServiceResult<Vec<u8>> {
///         match request.route.as_str() {
///             "echo" => Ok(payload.to_vec()),
///             other => Err(ServiceError::UnknownRoute(other.to_string())),
///         }
///     }
///
///     async fn on_stop(&self, _ctx: &ServiceContext) -> ServiceResult<()> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait ServiceModule: Send + Sync + 'static {
    /// Called while the module is `Starting`; it moves to `Serving` on success
    async fn on_start(&self, ctx: &ServiceContext) -> ServiceResult<()>;

    /// Handle one request.
    ///
    /// `payload` is the JSON-encoded request body for `request.route`.
    /// Returns the JSON-encoded result envelope.
    async fn handle_request(
        &self,
        ctx: &ServiceContext,
        request: &RequestContext,
        payload: &[u8],
    ) -> ServiceResult<Vec<u8>>;

    /// Called while `Draining`, after in-flight requests have finished
    async fn on_stop(&self, ctx: &ServiceContext) -> ServiceResult<()>;

    fn metadata(&self) -> Option<ServiceMetadata> {
        None
    }

    /// Route tags this module answers
    fn routes(&self) -> Vec<&'static str> {
        Vec::new()
    }
}

#[cfg(test)]
#[path = "service/service_tests.rs"]
mod service_tests;
