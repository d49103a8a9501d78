#![allow(non_snake_case)]

use super::*;

struct EchoModule;

#[async_trait]
impl ServiceModule for EchoModule {
    async fn on_start(&self, _ctx: &ServiceContext) -> ServiceResult<()> {
        Ok(())
    }

    async fn handle_request(
        &self,
        _ctx: &ServiceContext,
        request: &RequestContext,
        payload: &[u8],
    ) -> ServiceResult<Vec<u8>> {
        request.cancel.check()?;
        match request.route.as_str() {
            "echo" => Ok(payload.to_vec()),
            other => Err(ServiceError::UnknownRoute(other.to_string())),
        }
    }

    async fn on_stop(&self, _ctx: &ServiceContext) -> ServiceResult<()> {
        Ok(())
    }

    fn routes(&self) -> Vec<&'static str> {
        vec!["echo"]
    }
}

// ServiceContext tests

#[test]
fn ServiceContext___new___starts_registered() {
    let ctx = ServiceContext::new(ServiceConfig::default());

    assert_eq!(ctx.state(), ModuleState::Registered);
}

#[test]
fn ServiceContext___transition_to_valid___updates_state() {
    let ctx = ServiceContext::new(ServiceConfig::default());

    ctx.transition_to(ModuleState::Starting).unwrap();
    ctx.transition_to(ModuleState::Serving).unwrap();

    assert_eq!(ctx.state(), ModuleState::Serving);
}

#[test]
fn ServiceContext___transition_to_invalid___returns_invalid_state() {
    let ctx = ServiceContext::new(ServiceConfig::default());

    let result = ctx.transition_to(ModuleState::Serving);

    assert!(matches!(
        result,
        Err(ServiceError::InvalidState { ref actual, .. }) if actual == "Registered"
    ));
    assert_eq!(ctx.state(), ModuleState::Registered);
}

#[test]
fn ServiceContext___set_state___bypasses_validation() {
    let ctx = ServiceContext::new(ServiceConfig::default());
    ctx.set_state(ModuleState::Stopped);

    ctx.set_state(ModuleState::Faulted);

    assert_eq!(ctx.state(), ModuleState::Faulted);
}

// ServiceModule tests

#[tokio::test]
async fn ServiceModule___handle_request_known_route___returns_payload() {
    let ctx = ServiceContext::new(ServiceConfig::default());
    let request = RequestContext::new(1, "echo");

    let result = EchoModule.handle_request(&ctx, &request, b"{}").await;

    assert_eq!(result.unwrap(), b"{}".to_vec());
}

#[tokio::test]
async fn ServiceModule___handle_request_unknown_route___returns_unknown_route() {
    let ctx = ServiceContext::new(ServiceConfig::default());
    let request = RequestContext::new(1, "nope");

    let result = EchoModule.handle_request(&ctx, &request, b"{}").await;

    assert!(matches!(result, Err(ServiceError::UnknownRoute(tag)) if tag == "nope"));
}

#[tokio::test]
async fn ServiceModule___handle_request_cancelled___returns_cancelled() {
    let ctx = ServiceContext::new(ServiceConfig::default());
    let handle = crate::CancelHandle::new();
    handle.cancel();
    let request = RequestContext::new(1, "echo").with_cancel(handle.signal());

    let result = EchoModule.handle_request(&ctx, &request, b"{}").await;

    assert!(matches!(result, Err(ServiceError::Cancelled)));
}

#[test]
fn ServiceModule___defaults___no_metadata() {
    assert!(EchoModule.metadata().is_none());
    assert_eq!(EchoModule.routes(), vec!["echo"]);
}
