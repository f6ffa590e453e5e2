//! Server host for transport-agnostic request execution
//!
//! The host owns everything a request needs besides the request itself: the
//! configuration, the engine, the store backend and the id generator. It runs
//! the per-request cycle load → execute → save and is shared by exposures.

use crate::config::ServerConfig;
use crate::core::error::EngineError;
use crate::core::id::IdGenerator;
use crate::engine::{Outcome, QueryEngine, Request};
use crate::storage::StoreBackend;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Host context containing all server state
///
/// # Example
///
/// ```rust,ignore
/// let host = ServerHost::new(
///     config,
///     Arc::new(JsonFileStore::new("db.json")),
///     Arc::new(TimestampIdGenerator::new()),
/// );
/// let outcome = host.execute(request).await?;
/// ```
pub struct ServerHost {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Query engine built from the matching rules
    pub engine: QueryEngine,

    /// Durable storage of the store
    pub backend: Arc<dyn StoreBackend>,

    /// Identifier source for created records
    pub ids: Arc<dyn IdGenerator>,

    /// Serializes write cycles so concurrent writers cannot lose updates
    write_lock: Mutex<()>,
}

impl ServerHost {
    pub fn new(
        config: ServerConfig,
        backend: Arc<dyn StoreBackend>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let engine = QueryEngine::from_config(&config.matching);
        Self {
            config: Arc::new(config),
            engine,
            backend,
            ids,
            write_lock: Mutex::new(()),
        }
    }

    /// Run one request against a freshly loaded store
    ///
    /// Reads load and resolve without locking. Writes hold the write lock for
    /// the whole load → mutate → save cycle, and save only when the store was
    /// actually mutated. A write is refused when the store cannot be loaded.
    pub async fn execute(&self, request: Request) -> Result<Outcome, EngineError> {
        if !request.action.is_write() {
            let mut store = self.backend.load().await;
            return self.engine.execute(&mut store, request, self.ids.as_ref());
        }

        let _guard = self.write_lock.lock().await;
        let mut store = self.backend.load_for_write().await?;
        let outcome = self.engine.execute(&mut store, request, self.ids.as_ref())?;

        if outcome.is_mutation() {
            self.backend.save(&store).await?;
        }

        Ok(outcome)
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }
}
