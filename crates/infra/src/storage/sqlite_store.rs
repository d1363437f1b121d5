//! SQLite-backed document store (the local mirror).
//!
//! Documents are JSON text keyed by their storage path. All database work
//! runs in `spawn_blocking` to avoid blocking the async runtime.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use huddle_core::DocumentStore;
use huddle_domain::{HuddleError, Result};
use rusqlite::{params, OptionalExtension};
use serde_json::Value;
use tokio::task::{self, JoinError};
use tracing::trace;

use super::manager::{map_sql_error, DbManager, SqliteConnection};
use crate::errors::InfraError;

/// [`DocumentStore`] backed by the on-device SQLite mirror.
pub struct SqliteDocumentStore {
    db: Arc<DbManager>,
}

impl SqliteDocumentStore {
    /// Store over an already migrated database.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Number of stored documents.
    pub async fn count(&self) -> Result<u64> {
        self.with_connection(|conn| {
            conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get::<_, i64>(0))
                .map(|count| count.max(0) as u64)
                .map_err(map_sql_error)
        })
        .await
    }

    async fn with_connection<T, F>(&self, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteConnection) -> Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || {
            let conn = db.get_connection()?;
            work(&conn)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let key = key.to_string();
        let raw: Option<String> = self
            .with_connection(move |conn| {
                conn.query_row("SELECT value FROM documents WHERE key = ?1", params![key], |row| {
                    row.get(0)
                })
                .optional()
                .map_err(map_sql_error)
            })
            .await?;

        raw.map(|text| serde_json::from_str::<Value>(&text).map_err(map_json_error)).transpose()
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let key = key.to_string();
        let text = serde_json::to_string(&value).map_err(map_json_error)?;
        let updated_at = Utc::now().timestamp_millis();

        self.with_connection(move |conn| {
            conn.execute(
                "INSERT INTO documents (key, value, updated_at) VALUES (?1, ?2, ?3) \
                 ON CONFLICT(key) DO UPDATE \
                 SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, text, updated_at],
            )
            .map_err(map_sql_error)?;
            trace!(key = %key, "document mirrored");
            Ok(())
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.with_connection(move |conn| {
            conn.execute("DELETE FROM documents WHERE key = ?1", params![key])
                .map_err(map_sql_error)?;
            Ok(())
        })
        .await
    }
}

fn map_json_error(err: serde_json::Error) -> HuddleError {
    InfraError::from(err).into()
}

fn map_join_error(err: JoinError) -> HuddleError {
    if err.is_cancelled() {
        HuddleError::Internal("blocking database task cancelled".into())
    } else {
        HuddleError::Internal(format!("blocking database task failed: {err}"))
    }
}
