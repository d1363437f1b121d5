//! # Huddle Infrastructure
//!
//! Adapters for the ports defined in `huddle-core`.
//!
//! This crate contains:
//! - The remote REST document store (`reqwest`)
//! - The on-device SQLite mirror (`rusqlite` + `r2d2`)
//! - Configuration loading and tracing subscriber setup
//!
//! ## Architecture
//! - Implements traits defined in `huddle-core`
//! - Contains all "impure" code (network, disk, environment)

pub mod config;
pub mod errors;
pub mod http;
pub mod logging;
pub mod storage;

pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use storage::{DbManager, HttpDocumentStore, SqliteDocumentStore};
