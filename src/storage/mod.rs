//! Persistence backends for the document store
//!
//! A backend loads the whole store before a request and saves it back after a
//! successful mutation. Loading for a read never fails: unreadable or
//! undecodable data is logged and replaced by an empty store. Loading for a
//! write surfaces those errors so a damaged file is never overwritten.

pub mod in_memory;
pub mod json_file;

pub use in_memory::InMemoryStore;
pub use json_file::JsonFileStore;

use crate::core::error::StorageError;
use crate::core::record::Store;
use async_trait::async_trait;

/// Load/save contract between the server and durable storage
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Read the current store, or an empty one on any read/parse error
    async fn load(&self) -> Store;

    /// Read the store ahead of a mutation
    ///
    /// Backends that can fail to decode existing data must report it here
    /// instead of handing back an empty store that would replace it on save.
    async fn load_for_write(&self) -> Result<Store, StorageError> {
        Ok(self.load().await)
    }

    /// Persist the full store
    async fn save(&self, store: &Store) -> Result<(), StorageError>;

    /// Short name used in logs
    fn backend_name(&self) -> &'static str;
}
