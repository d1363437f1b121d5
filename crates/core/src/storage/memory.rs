//! In-memory document store
//!
//! Useful as a process-lifetime cache and as a deterministic stand-in for
//! either side of the coordinator in tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use huddle_domain::Result;
use parking_lot::RwLock;
use serde_json::Value;

use super::ports::DocumentStore;

/// Thread-safe map-backed [`DocumentStore`]. Clones share the same data.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<BTreeMap<String, Value>>>,
}

impl InMemoryDocumentStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// No documents stored.
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// Whether a document exists under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.documents.read().contains_key(key)
    }

    /// Keys starting with `prefix`, in order.
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.documents.read().keys().filter(|key| key.starts_with(prefix)).cloned().collect()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.documents.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.documents.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.documents.write().remove(key);
        Ok(())
    }
}
