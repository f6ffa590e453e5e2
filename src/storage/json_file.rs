//! Store backed by a single JSON file

use super::StoreBackend;
use crate::core::error::StorageError;
use crate::core::record::Store;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// JSON file backend
///
/// The file holds one object mapping resource names to arrays of records.
/// Other top-level values are kept as they are. A missing file is an empty
/// store; a file that cannot be read or decoded is served as empty but never
/// written over. Saves are pretty-printed with two-space indentation and go through a
/// sibling temp file renamed over the target, so a crash mid-write never
/// leaves a truncated document behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Store, StorageError> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(Store::from_json_slice(&bytes)?)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StoreBackend for JsonFileStore {
    async fn load(&self) -> Store {
        self.load_for_write().await.unwrap_or_else(|e| {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to load store, starting empty"
            );
            Store::new()
        })
    }

    async fn load_for_write(&self) -> Result<Store, StorageError> {
        match self.read().await {
            Err(StorageError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Store file missing, starting empty");
                Ok(Store::new())
            }
            result => result,
        }
    }

    async fn save(&self, store: &Store) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(store)?;
        let temp = self.temp_path();

        tokio::fs::write(&temp, &json).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        tracing::debug!(
            path = %self.path.display(),
            resources = store.len(),
            "Store saved"
        );
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "json-file"
    }
}
