//! RocksDB document store
//!
//! Documents live in a `documents` column family keyed `collection:id`, so
//! one collection occupies one contiguous key range and a prefix scan reads
//! it back in key order. The stored value is a bincode envelope holding the
//! id, the creation timestamp and the JSON-encoded field map.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, Direction, IteratorMode, Options, DB};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{DocumentStore, RawDocument, StoreError, StoreResult};

const DOCUMENTS_CF: &str = "documents";

/// Serialized document envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredDocument {
    id: String,
    created_at: i64,
    fields: Vec<u8>, // JSON-encoded field map
}

/// RocksDB-backed persistent document store
pub struct RocksStore {
    db: DB,
}

impl RocksStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();

        info!("Opening document store at: {}", path.display());

        std::fs::create_dir_all(path).map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);

        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new("default", Options::default()),
            ColumnFamilyDescriptor::new(DOCUMENTS_CF, Self::documents_cf_options()),
        ];

        let db = DB::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        debug!("Document store opened successfully");

        Ok(Self { db })
    }

    /// Column family options for documents
    fn documents_cf_options() -> Options {
        let mut opts = Options::default();
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts
    }

    fn documents_cf(&self) -> StoreResult<&ColumnFamily> {
        self.db.cf_handle(DOCUMENTS_CF).ok_or_else(|| {
            StoreError::Unavailable(format!("missing column family '{}'", DOCUMENTS_CF))
        })
    }

    /// Create document key with collection prefix
    fn document_key(collection: &str, id: &str) -> Vec<u8> {
        format!("{}:{}", collection, id).into_bytes()
    }
}

fn decode_document(value: &[u8]) -> Result<RawDocument, String> {
    let stored: StoredDocument = bincode::deserialize(value).map_err(|e| e.to_string())?;
    let fields: Map<String, Value> =
        serde_json::from_slice(&stored.fields).map_err(|e| e.to_string())?;
    Ok(RawDocument { id: stored.id, created_at: stored.created_at, fields })
}

#[async_trait]
impl DocumentStore for RocksStore {
    async fn insert(&self, collection: &str, fields: Map<String, Value>) -> StoreResult<String> {
        let cf = self.documents_cf()?;

        let id = Uuid::new_v4().simple().to_string();
        let encoded = serde_json::to_vec(&fields).map_err(|e| StoreError::Write(e.to_string()))?;
        let stored = StoredDocument {
            id: id.clone(),
            created_at: Utc::now().timestamp_millis(),
            fields: encoded,
        };

        let value = bincode::serialize(&stored).map_err(|e| StoreError::Write(e.to_string()))?;
        let key = Self::document_key(collection, &id);

        self.db.put_cf(cf, key, value).map_err(|e| StoreError::Write(e.to_string()))?;

        debug!("Stored document {} in {}", id, collection);

        Ok(id)
    }

    async fn find(&self, collection: &str, limit: usize) -> StoreResult<Vec<RawDocument>> {
        let cf = self.documents_cf()?;

        let prefix = format!("{}:", collection);
        let mut documents = Vec::new();

        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(prefix.as_bytes(), Direction::Forward));

        for item in iter {
            if documents.len() >= limit {
                break;
            }
            let (key, value) = item.map_err(|e| StoreError::Unavailable(e.to_string()))?;
            if !key.starts_with(prefix.as_bytes()) {
                break;
            }
            match decode_document(&value) {
                Ok(document) => documents.push(document),
                Err(e) => warn!("Skipping corrupt document in {}: {}", collection, e),
            }
        }

        Ok(documents)
    }

    async fn collection_names(&self) -> StoreResult<Vec<String>> {
        let cf = self.documents_cf()?;

        let mut names = HashSet::new();
        let iter = self.db.iterator_cf(cf, IteratorMode::Start);

        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Unavailable(e.to_string()))?;
            if let Ok(key_str) = std::str::from_utf8(&key) {
                if let Some(name) = key_str.split(':').next() {
                    names.insert(name.to_string());
                }
            }
        }

        let mut names: Vec<String> = names.into_iter().collect();
        names.sort();
        Ok(names)
    }

    async fn close(&self) -> StoreResult<()> {
        self.db.flush().map_err(|e| StoreError::Write(e.to_string()))?;
        debug!("Flushed document store to disk");
        Ok(())
    }
}
