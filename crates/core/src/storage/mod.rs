//! Document storage ports and key layout

mod keys;
mod memory;
pub mod ports;

pub use keys::StorageKey;
pub use memory::InMemoryDocumentStore;
pub use ports::DocumentStore;
