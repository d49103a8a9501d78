//! Call one route against a fixture backend

use crate::config;
use anyhow::{Context, Result};
use jrtest::{ServiceConfig, ServiceDependencies};
use jrtest_service::{FixtureBackend, FixtureData};
use jrtest_transport::{HttpMethod, RequestEnvelope, Route, WireResponse};
use std::path::Path;
use std::sync::Arc;

/// Load a fixture file; `.json` is parsed as JSON, anything else as TOML
pub fn load_fixture(path: impl AsRef<Path>) -> Result<FixtureData> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixture: {:?}", path))?;

    if config::is_json(path) {
        FixtureData::from_json(&content).context("Failed to parse JSON fixture")
    } else {
        toml::from_str(&content).context("Failed to parse fixture")
    }
}

/// Build the request for `target`: a route tag, or `"METHOD path"`
pub fn build_request(target: &str, payload: Option<&str>) -> Result<RequestEnvelope> {
    let body = match payload {
        Some(raw) => serde_json::from_str(raw).context("Payload is not valid JSON")?,
        None => serde_json::Value::Null,
    };

    match target.trim().split_once(char::is_whitespace) {
        Some((method, path)) => {
            let method = HttpMethod::parse(method)
                .with_context(|| format!("Unknown HTTP method: {}", method))?;
            let resolved = Route::resolve(method, path.trim())?;
            Ok(resolved.into_request(body)?)
        }
        None => {
            let route = Route::from_tag(target.trim()).with_context(|| {
                format!("Unknown route: {} (see `jrtest routes`)", target.trim())
            })?;
            Ok(RequestEnvelope::new(route.tag(), body))
        }
    }
}

/// Host the service over `fixture`, dispatch one request and shut down
pub fn execute(
    fixture: FixtureData,
    request: &RequestEnvelope,
    config: ServiceConfig,
) -> Result<WireResponse> {
    let shutdown_timeout_ms = config.shutdown_timeout_ms;
    let backend = Arc::new(FixtureBackend::new(fixture));
    let deps = ServiceDependencies::new(backend.clone(), backend);
    let handle = jrtest::start_service(deps, config)?;

    let response = handle.dispatch(request);
    handle.shutdown(shutdown_timeout_ms)?;
    Ok(response)
}

/// Call command implementation
pub fn run(
    fixture_path: &str,
    target: &str,
    payload: Option<&str>,
    config_path: Option<&str>,
    pretty: bool,
) -> Result<()> {
    let config = match config_path {
        Some(path) => config::load(path)?,
        None => ServiceConfig::default(),
    };
    config::validate(&config)?;

    let fixture = load_fixture(fixture_path)?;
    let request = build_request(target, payload)?;
    let response = execute(fixture, &request, config)?;

    let output = if pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", output);

    if !response.is_success() {
        anyhow::bail!(
            "{} failed with status {}",
            request.route,
            response.transport_status
        );
    }
    Ok(())
}
