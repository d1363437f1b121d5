//! `DocumentStore` adapters
//!
//! - [`SqliteDocumentStore`]: on-device mirror backed by a pooled SQLite file
//! - [`HttpDocumentStore`]: remote REST document database

mod http_store;
mod manager;
mod sqlite_store;

pub use http_store::HttpDocumentStore;
pub use manager::DbManager;
pub use sqlite_store::SqliteDocumentStore;
