//! Route table: HTTP method and path to route tag

use crate::envelope::RequestEnvelope;
use jrtest_core::{ServiceError, ServiceResult};
use serde::{Deserialize, Serialize};

/// Path prefix every route is mounted under
pub const ROUTE_PREFIX: &str = "JRTestService";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            _ => None,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

/// Every endpoint the service exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    WorkspaceGet,
    WorkspaceSearch,
    ApplicationList,
    AuditMetrics,
    AuditLatestId,
    AuditLatestTime,
    ReviewerStatistics,
    ReviewerChoices,
    AuditPivot,
}

impl Route {
    pub const ALL: [Route; 9] = [
        Route::WorkspaceGet,
        Route::WorkspaceSearch,
        Route::ApplicationList,
        Route::AuditMetrics,
        Route::AuditLatestId,
        Route::AuditLatestTime,
        Route::ReviewerStatistics,
        Route::ReviewerChoices,
        Route::AuditPivot,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Route::WorkspaceGet => "workspace.get",
            Route::WorkspaceSearch => "workspace.search",
            Route::ApplicationList => "application.list",
            Route::AuditMetrics => "audit.metrics",
            Route::AuditLatestId => "audit.latest_id",
            Route::AuditLatestTime => "audit.latest_time",
            Route::ReviewerStatistics => "reviewer.statistics",
            Route::ReviewerChoices => "reviewer.choices",
            Route::AuditPivot => "audit.pivot",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|route| route.tag() == tag)
    }

    pub fn method(self) -> HttpMethod {
        match self {
            Route::WorkspaceSearch | Route::ReviewerStatistics | Route::ReviewerChoices => {
                HttpMethod::Post
            }
            _ => HttpMethod::Get,
        }
    }

    /// Path relative to [`ROUTE_PREFIX`]; `{workspace_id}` is an integer segment
    pub fn path_template(self) -> &'static str {
        match self {
            Route::WorkspaceGet => "workspace/{workspace_id}",
            Route::WorkspaceSearch => "workspace",
            Route::ApplicationList => "application",
            Route::AuditMetrics => "audit/{workspace_id}",
            Route::AuditLatestId => "audit/query/{workspace_id}",
            Route::AuditLatestTime => "audit/time/{workspace_id}",
            Route::ReviewerStatistics => "reviewer/statistics",
            Route::ReviewerChoices => "reviewer/choices",
            Route::AuditPivot => "audit/pivot/{workspace_id}",
        }
    }

    /// Query-string keys the route accepts
    pub fn query_keys(self) -> &'static [&'static str] {
        match self {
            Route::WorkspaceSearch => &["limit"],
            _ => &[],
        }
    }

    /// Map an HTTP request onto a route.
    ///
    /// `path` may carry a leading `/`, the [`ROUTE_PREFIX`] segment and a
    /// query string. Integer query values are decoded as numbers.
    pub fn resolve(method: HttpMethod, path: &str) -> ServiceResult<ResolvedRoute> {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };
        let path = path.trim_matches('/');
        let path = path
            .strip_prefix(ROUTE_PREFIX)
            .map(|rest| rest.trim_start_matches('/'))
            .unwrap_or(path);
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        for route in Self::ALL {
            if route.method() != method {
                continue;
            }
            let Some(mut params) = match_template(route.path_template(), &segments) else {
                continue;
            };
            if let Some(query) = query {
                parse_query(route, query, &mut params)?;
            }
            return Ok(ResolvedRoute { route, params });
        }

        Err(ServiceError::UnknownRoute(format!("{} /{}", method, path)))
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

fn match_template(
    template: &str,
    segments: &[&str],
) -> Option<serde_json::Map<String, serde_json::Value>> {
    let parts: Vec<&str> = template.split('/').collect();
    if parts.len() != segments.len() {
        return None;
    }
    let mut params = serde_json::Map::new();
    for (part, segment) in parts.iter().zip(segments) {
        match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
            Some(name) => {
                let value: i32 = segment.parse().ok()?;
                params.insert(name.to_string(), value.into());
            }
            None if part.eq_ignore_ascii_case(segment) => {}
            None => return None,
        }
    }
    Some(params)
}

fn parse_query(
    route: Route,
    query: &str,
    params: &mut serde_json::Map<String, serde_json::Value>,
) -> ServiceResult<()> {
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if !route.query_keys().contains(&key) {
            continue;
        }
        let value: i64 = value.parse().map_err(|_| {
            ServiceError::Validation(format!("{} must be an integer, got '{}'", key, value))
        })?;
        params.insert(key.to_string(), value.into());
    }
    Ok(())
}

/// A route plus the parameters extracted from its path and query string
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoute {
    pub route: Route,
    pub params: serde_json::Map<String, serde_json::Value>,
}

impl ResolvedRoute {
    /// Build the request envelope, merging path/query parameters into `body`.
    ///
    /// Extracted parameters win over same-named body fields. A non-object
    /// body is only accepted when nothing was extracted.
    pub fn into_request(self, body: serde_json::Value) -> ServiceResult<RequestEnvelope> {
        let payload = match body {
            serde_json::Value::Null if self.params.is_empty() => serde_json::Value::Null,
            serde_json::Value::Null => serde_json::Value::Object(self.params),
            serde_json::Value::Object(mut fields) => {
                fields.extend(self.params);
                serde_json::Value::Object(fields)
            }
            other if self.params.is_empty() => other,
            _ => {
                return Err(ServiceError::Validation(format!(
                    "request body for {} must be a JSON object",
                    self.route
                )));
            }
        };
        Ok(RequestEnvelope::new(self.route.tag(), payload))
    }
}

#[cfg(test)]
#[path = "route/route_tests.rs"]
mod route_tests;
