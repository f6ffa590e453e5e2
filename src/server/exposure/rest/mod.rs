//! REST API exposure
//!
//! The REST exposure consumes a `ServerHost` and produces an Axum `Router`
//! with health checks, any custom routes, and the catch-all resource routes.
//! The middleware stack adds request tracing, CORS and panic recovery.

pub mod handlers;

use super::super::host::ServerHost;
use crate::config::CorsConfig;
use crate::core::error::EngineError;
use crate::server::router::build_resource_routes;
use anyhow::Result;
use axum::{
    Json, Router,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// Static routes (health checks, custom routes) take precedence over the
    /// resource catch-all, so a collection named `health` is shadowed.
    pub fn build_router(host: Arc<ServerHost>, custom_routes: Vec<Router>) -> Result<Router> {
        let cors = &host.config.cors;
        let cors_layer = cors.enabled.then(|| build_cors_layer(cors));

        let mut app = Self::health_routes();

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        app = app.merge(build_resource_routes(host.clone()));

        tracing::info!(
            backend = host.backend_name(),
            prefix = ?host.config.route_prefix,
            "REST exposure ready"
        );

        let app = app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(handle_panic)),
        );

        // CORS wraps everything so panic responses carry its headers too
        Ok(match cors_layer {
            Some(layer) => app.layer(layer),
            None => app,
        })
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "restdb"
        }))
    }
}

/// Builds the CORS layer from comma-separated lists or `*`
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.origins.trim() == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    if config.methods.trim() == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    if config.headers.trim() == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors.expose_headers([handlers::TOTAL_COUNT_HEADER])
}

/// Turn a handler panic into a 500 with the usual error body
fn handle_panic(panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    EngineError::Internal(detail).into_response()
}
