//! In-memory document store
//!
//! Backs tests and `memory://` deployments. Documents live in a map of
//! collection name to insertion-ordered vec behind an async lock, so the
//! natural return order is insertion order.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DocumentStore, RawDocument, StoreResult};

/// Volatile store keyed by collection name
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<RawDocument>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, fields: Map<String, Value>) -> StoreResult<String> {
        let id = Uuid::new_v4().simple().to_string();
        let document = RawDocument {
            id: id.clone(),
            created_at: Utc::now().timestamp_millis(),
            fields,
        };

        let mut collections = self.collections.write().await;
        collections.entry(collection.to_string()).or_default().push(document);
        Ok(id)
    }

    async fn find(&self, collection: &str, limit: usize) -> StoreResult<Vec<RawDocument>> {
        let collections = self.collections.read().await;
        let documents = match collections.get(collection) {
            Some(documents) => documents.iter().take(limit).cloned().collect(),
            None => Vec::new(),
        };
        Ok(documents)
    }

    async fn collection_names(&self) -> StoreResult<Vec<String>> {
        let collections = self.collections.read().await;
        let mut names: Vec<String> = collections
            .iter()
            .filter(|(_, documents)| !documents.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_unique_ids() {
        let store = MemoryStore::new();
        let first = store.insert("risk", fields(json!({"title": "a"}))).await.unwrap();
        let second = store.insert("risk", fields(json!({"title": "b"}))).await.unwrap();

        assert!(!first.is_empty());
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_find_preserves_insertion_order() {
        let store = MemoryStore::new();
        for title in ["a", "b", "c"] {
            store.insert("risk", fields(json!({"title": title}))).await.unwrap();
        }

        let documents = store.find("risk", 100).await.unwrap();
        let titles: Vec<&str> = documents
            .iter()
            .map(|doc| doc.fields["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_find_honors_limit() {
        let store = MemoryStore::new();
        for n in 0..5 {
            store.insert("role", fields(json!({"name": n.to_string()}))).await.unwrap();
        }

        assert_eq!(store.find("role", 2).await.unwrap().len(), 2);
        assert_eq!(store.find("role", 100).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_find_missing_collection_is_empty() {
        let store = MemoryStore::new();
        assert!(store.find("application", 100).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_collection_names_sorted() {
        let store = MemoryStore::new();
        store.insert("risk", Map::new()).await.unwrap();
        store.insert("application", Map::new()).await.unwrap();

        assert_eq!(store.collection_names().await.unwrap(), vec!["application", "risk"]);
    }

    #[tokio::test]
    async fn test_documents_carry_creation_timestamp() {
        let store = MemoryStore::new();
        store.insert("process", fields(json!({"name": "Billing"}))).await.unwrap();

        let documents = store.find("process", 1).await.unwrap();
        assert!(documents[0].created_at > 0);
    }
}
