//! In-memory store backend for testing and embedding

use super::StoreBackend;
use crate::core::error::StorageError;
use crate::core::record::Store;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, RwLock};

/// In-memory backend
///
/// Uses RwLock for thread-safe access. Clones share the same store.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    store: Arc<RwLock<Store>>,
}

impl InMemoryStore {
    /// Create an empty in-memory backend
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: Store) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Seed from a JSON document
    pub fn from_json(value: Value) -> Result<Self, StorageError> {
        Ok(Self::with_store(Store::from_value(value)?))
    }

    /// Current contents
    pub fn snapshot(&self) -> Store {
        match self.store.read() {
            Ok(store) => store.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn load(&self) -> Store {
        self.snapshot()
    }

    async fn save(&self, store: &Store) -> Result<(), StorageError> {
        let mut current = self
            .store
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;

        *current = store.clone();

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "in-memory"
    }
}
