//! Document store seam
//!
//! The rest of the service talks to storage through the [`DocumentStore`]
//! trait: insert one validated record, read a collection back, list the
//! collections that hold data, and close. Two backends implement it, a
//! RocksDB store for real deployments and an in-memory store for tests and
//! ephemeral runs. [`connect`] picks the backend from the configured URL;
//! when nothing usable is configured the service runs storeless and the
//! HTTP layer degrades instead of failing startup.

pub mod memory;
pub mod rocks;

pub use memory::MemoryStore;
pub use rocks::RocksStore;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;

/// Errors surfaced by document store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store cannot be reached or read
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected or failed a write
    #[error("document store write failed: {0}")]
    Write(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// A stored document as the adapter returns it: the store-assigned id, the
/// creation timestamp in Unix milliseconds, and the record fields
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    pub id: String,
    pub created_at: i64,
    pub fields: Map<String, Value>,
}

/// Backend-agnostic document operations.
///
/// Collections spring into existence on first insert; reading a collection
/// that was never written yields an empty vec, not an error.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert one record and return the store-assigned id
    async fn insert(&self, collection: &str, fields: Map<String, Value>) -> StoreResult<String>;

    /// Read up to `limit` documents from a collection, in the store's
    /// natural order
    async fn find(&self, collection: &str, limit: usize) -> StoreResult<Vec<RawDocument>>;

    /// Names of collections holding at least one document, sorted
    async fn collection_names(&self) -> StoreResult<Vec<String>>;

    /// Flush and release the store
    async fn close(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Open the configured document store, if any.
///
/// Both `DATABASE_URL` and `DATABASE_NAME` must be set. The URL scheme
/// selects the backend: `memory://` gives the in-memory store, anything
/// else is treated as a RocksDB base path (with an optional `rocksdb://`
/// prefix) and the database name becomes a subdirectory of it. An open
/// failure is logged and leaves the service storeless rather than aborting
/// startup.
pub async fn connect(config: &Config) -> Option<Arc<dyn DocumentStore>> {
    if !config.store_configured() {
        info!("DATABASE_URL or DATABASE_NAME not set, running without a document store");
        return None;
    }
    let url = config.database_url.as_deref()?;
    let name = config.database_name.as_deref()?;

    if url.starts_with("memory:") {
        info!("Using in-memory document store '{}'", name);
        return Some(Arc::new(MemoryStore::new()));
    }

    let base = url.strip_prefix("rocksdb://").unwrap_or(url);
    let path = PathBuf::from(base).join(name);
    match RocksStore::open(&path) {
        Ok(store) => {
            info!("Opened document store at: {}", path.display());
            Some(Arc::new(store))
        }
        Err(e) => {
            warn!("Failed to open document store at {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: Option<&str>, name: Option<&str>) -> Config {
        Config {
            database_url: url.map(str::to_string),
            database_name: name.map(str::to_string),
            port: 0,
        }
    }

    #[tokio::test]
    async fn test_connect_requires_both_settings() {
        assert!(connect(&config(None, None)).await.is_none());
        assert!(connect(&config(Some("memory://"), None)).await.is_none());
        assert!(connect(&config(None, Some("ea"))).await.is_none());
    }

    #[tokio::test]
    async fn test_connect_memory_scheme() {
        let store = connect(&config(Some("memory://"), Some("ea"))).await.unwrap();
        assert_eq!(store.collection_names().await.unwrap(), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_connect_rocksdb_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let url = format!("rocksdb://{}", dir.path().display());
        let store = connect(&config(Some(&url), Some("ea"))).await.unwrap();

        let id = store
            .insert("application", Map::new())
            .await
            .unwrap();
        assert!(!id.is_empty());
        assert!(dir.path().join("ea").exists());
    }

    #[tokio::test]
    async fn test_connect_failed_open_leaves_storeless() {
        let dir = tempfile::TempDir::new().unwrap();
        // a regular file occupies the spot the store directory would take
        std::fs::write(dir.path().join("ea"), b"occupied").unwrap();

        let url = format!("rocksdb://{}", dir.path().display());
        assert!(connect(&config(Some(&url), Some("ea"))).await.is_none());
    }
}
