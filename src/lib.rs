//! # restdb
//!
//! A zero-configuration REST query engine over a JSON document store.
//!
//! The store is one JSON object mapping resource names to arrays of records.
//! Every collection in it is served over HTTP without any declaration:
//!
//! | Request | Result |
//! |---------|--------|
//! | `GET /` | The whole store |
//! | `GET /{resource}` | The collection, filtered, sorted and paginated |
//! | `GET /{resource}/{id}` | One record |
//! | `GET /{resource}/{id}/bookmarks` | The record's nested collection |
//! | `POST /{resource}` | Create a record with a generated id |
//! | `PUT /{resource}/{id}` | Replace a record |
//! | `PATCH /{resource}/{id}` | Merge fields into a record |
//! | `DELETE /{resource}/{id}` | Remove a record |
//!
//! Query parameters `_limit`, `_page`, `_sort` and `_order` drive pagination
//! and sorting; every other parameter is an equality or text filter.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use restdb::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     restdb::init_logging("info");
//!     ServerBuilder::new()
//!         .with_config(ServerConfig::load(None)?)
//!         .serve()
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod engine;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        EngineError, IdGenerator, QueryParams, Record, RecordId, SortOrder, StorageError, Store,
        TimestampIdGenerator, UuidIdGenerator,
    };

    // === Engine ===
    pub use crate::engine::{Action, Outcome, QueryEngine, Request, Resolved, Target};

    // === Storage ===
    pub use crate::storage::{InMemoryStore, JsonFileStore, StoreBackend};

    // === Config ===
    pub use crate::config::{CorsConfig, IdStrategy, MatchConfig, ServerConfig};

    // === Server ===
    pub use crate::server::{RestExposure, ServerBuilder, ServerHost};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde_json::{Value, json};
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` takes precedence over `level` when set. Call once at startup.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("restdb={},tower_http=debug", level)));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
