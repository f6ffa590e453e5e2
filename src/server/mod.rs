//! Server module for building the HTTP server
//!
//! This module provides a `ServerBuilder` that wires together:
//! - The store backend and identifier generator
//! - The catch-all resource routes handled by the query engine
//! - Health checks and any custom routes

pub mod builder;
pub mod exposure;
pub mod host;
pub mod router;

pub use builder::ServerBuilder;
pub use exposure::RestExposure;
pub use host::ServerHost;
