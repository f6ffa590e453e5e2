//! HTTP handlers translating requests into engine calls

use crate::core::error::EngineError;
use crate::core::query::QueryParams;
use crate::engine::{Action, Outcome, Request, Target};
use crate::server::host::ServerHost;
use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::sync::Arc;

/// Header carrying the number of matches before pagination
pub const TOTAL_COUNT_HEADER: HeaderName = HeaderName::from_static("x-total-count");

/// Catch-all handler for every resource path
pub async fn handle_request(
    State(host): State<Arc<ServerHost>>,
    method: Method,
    uri: Uri,
    Query(pairs): Query<Vec<(String, String)>>,
    body: Bytes,
) -> Result<Response, EngineError> {
    if method == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }

    let action = Action::from_method(&method)?;
    let segments = path_segments(uri.path(), host.config.route_prefix.as_deref());
    let target = Target::from_segments(&segments)?;

    tracing::debug!(
        method = %method,
        path = %uri.path(),
        resource = ?target.resource,
        "Dispatching request"
    );

    let request = if action.is_write() {
        Request {
            action,
            target,
            params: QueryParams::new(),
            body: parse_body(&body)?,
        }
    } else {
        Request::read(target, QueryParams::from_pairs(pairs))
    };

    let outcome = host.execute(request).await?;

    if outcome.is_mutation() {
        tracing::info!(method = %method, path = %uri.path(), "Store updated");
    }

    Ok(render(outcome))
}

/// Split a request path, dropping empty segments and the route prefix
pub(crate) fn path_segments<'a>(path: &'a str, prefix: Option<&str>) -> Vec<&'a str> {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let prefix = prefix.map(|p| p.trim_matches('/')).filter(|p| !p.is_empty());
    if prefix.is_some() && segments.first().copied() == prefix {
        segments.remove(0);
    }

    segments
}

/// Decode a write body; an empty body means no payload
fn parse_body(body: &Bytes) -> Result<Option<Value>, EngineError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| EngineError::malformed(format!("Invalid JSON body: {}", e)))
}

fn render(outcome: Outcome) -> Response {
    let status = outcome.status_code();
    let total = match &outcome {
        Outcome::Read(resolved) => resolved.total_count(),
        _ => None,
    };

    let mut response = (status, Json(outcome.into_value())).into_response();

    if let Some(total) = total {
        response
            .headers_mut()
            .insert(TOTAL_COUNT_HEADER, HeaderValue::from(total));
    }

    response
}
