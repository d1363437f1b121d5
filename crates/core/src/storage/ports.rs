//! Port interfaces for document storage
//!
//! The remote store and the on-device store share this contract; the
//! coordinator decides which one is authoritative for each call.

use async_trait::async_trait;
use huddle_domain::Result;
use serde_json::Value;

/// Key-value document store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document; `None` when absent
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Create or replace a document
    async fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Delete a document; deleting an absent key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}
