//! Scripted `DocumentStore` mock
//!
//! Wraps the in-memory store and can be told to fail every call until it
//! recovers, or to reject writes under a key prefix. Clones share state so
//! a test can keep a handle on a store it handed to the coordinator.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use huddle_core::{DocumentStore, InMemoryDocumentStore};
use huddle_domain::{HuddleError, Result as DomainResult};
use parking_lot::Mutex;
use serde_json::Value;

#[derive(Default, Clone)]
pub struct ScriptedStore {
    documents: InMemoryDocumentStore,
    failure: Arc<Mutex<Option<HuddleError>>>,
    rejected_writes: Arc<Mutex<Vec<(String, HuddleError)>>>,
    writes: Arc<AtomicUsize>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that is unreachable from the start.
    pub fn offline() -> Self {
        let store = Self::new();
        store.fail_with(HuddleError::Network("connection refused".into()));
        store
    }

    /// Fail every subsequent call with `err`.
    pub fn fail_with(&self, err: HuddleError) {
        *self.failure.lock() = Some(err);
    }

    /// Reject `set` calls for keys starting with `prefix`.
    pub fn reject_writes_under(&self, prefix: &str, err: HuddleError) {
        self.rejected_writes.lock().push((prefix.to_string(), err));
    }

    pub fn recover(&self) {
        *self.failure.lock() = None;
    }

    /// Successful `set` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn documents(&self) -> &InMemoryDocumentStore {
        &self.documents
    }

    fn check(&self) -> DomainResult<()> {
        match self.failure.lock().as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentStore for ScriptedStore {
    async fn get(&self, key: &str) -> DomainResult<Option<Value>> {
        self.check()?;
        self.documents.get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> DomainResult<()> {
        self.check()?;
        let rejection = self
            .rejected_writes
            .lock()
            .iter()
            .find(|(prefix, _)| key.starts_with(prefix.as_str()))
            .map(|(_, err)| err.clone());
        if let Some(err) = rejection {
            return Err(err);
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.documents.set(key, value).await
    }

    async fn remove(&self, key: &str) -> DomainResult<()> {
        self.check()?;
        self.documents.remove(key).await
    }
}
