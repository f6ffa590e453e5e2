//! Router builder for the resource routes

use super::exposure::rest::handlers::handle_request;
use super::host::ServerHost;
use axum::{Router, routing::any};
use std::sync::Arc;

/// Build the catch-all resource routes
///
/// Resources are not declared up front: every path is handed to the engine,
/// which resolves it against whatever collections the store holds.
/// - ANY / - The whole store (GET) or a malformed write
/// - ANY /{*path} - Collections, records and nested collections
pub fn build_resource_routes(host: Arc<ServerHost>) -> Router {
    Router::new()
        .route("/", any(handle_request))
        .route("/{*path}", any(handle_request))
        .with_state(host)
}
