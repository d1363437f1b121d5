//! # Huddle Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (document stores, slot formatting)
//! - Drag-selection mapping for the availability grid
//! - Slot scoring and participation summaries
//! - The dual-write persistence coordinator and debounced autosave
//!
//! ## Architecture Principles
//! - Only depends on `huddle-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod scoring;
pub mod selection;
pub mod storage;
pub mod summary;
pub mod sync;

// Re-export specific items to avoid ambiguity
pub use scoring::{candidate_slots, ScoringEngine};
pub use selection::{
    apply_selection, coordinate_to_cell, SelectionCommit, SelectionMapper, SlotGrid,
};
pub use storage::{DocumentStore, InMemoryDocumentStore, StorageKey};
pub use summary::{IsoSlotFormatter, SlotFormatter, SummaryEngine};
pub use sync::{Autosaver, DualWriteCoordinator, NotificationChannel};
