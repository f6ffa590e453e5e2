//! ServerBuilder for fluent API to build HTTP servers

use super::exposure::RestExposure;
use super::host::ServerHost;
use crate::config::{IdStrategy, ServerConfig};
use crate::core::id::{IdGenerator, TimestampIdGenerator, UuidIdGenerator};
use crate::storage::{JsonFileStore, StoreBackend};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for creating the HTTP server
///
/// Without an explicit backend the store lives in the JSON file named by
/// `db_path`; without an explicit generator identifiers follow `id_strategy`.
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(ServerConfig::load(None)?)
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: ServerConfig,
    backend: Option<Arc<dyn StoreBackend>>,
    ids: Option<Arc<dyn IdGenerator>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with the default configuration
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            backend: None,
            ids: None,
            custom_routes: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a specific store backend instead of the JSON file
    pub fn with_backend(mut self, backend: impl StoreBackend + 'static) -> Self {
        self.backend = Some(Arc::new(backend));
        self
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Some(Arc::new(ids));
        self
    }

    /// Add custom routes to the server
    ///
    /// Custom routes are matched before the resource catch-all.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let admin = Router::new().route("/admin/stats", get(stats_handler));
    ///
    /// ServerBuilder::new()
    ///     .with_custom_routes(admin)
    ///     .build()?;
    /// ```
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the transport-agnostic host
    pub fn build_host(self) -> Result<ServerHost> {
        let backend: Arc<dyn StoreBackend> = match self.backend {
            Some(backend) => backend,
            None => Arc::new(JsonFileStore::new(self.config.db_path.clone())),
        };

        let ids: Arc<dyn IdGenerator> = match (self.ids, self.config.id_strategy) {
            (Some(ids), _) => ids,
            (None, IdStrategy::Timestamp) => Arc::new(TimestampIdGenerator::new()),
            (None, IdStrategy::Uuid) => Arc::new(UuidIdGenerator),
        };

        tracing::debug!(
            backend = backend.backend_name(),
            id_strategy = ?self.config.id_strategy,
            "Building server host"
        );

        Ok(ServerHost::new(self.config, backend, ids))
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let custom_routes = std::mem::take(&mut self.custom_routes);
        let host = Arc::new(self.build_host()?);
        RestExposure::build_router(host, custom_routes)
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `host:port` from the configuration and stops on SIGTERM or
    /// Ctrl+C once in-flight requests are done.
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.bind_address();
        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
