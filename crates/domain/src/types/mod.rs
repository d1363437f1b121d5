//! Domain types and models

pub mod availability;
pub mod chat;
pub mod group;
pub mod scoring;
pub mod selection;
pub mod slot;
pub mod sync;

pub use availability::{AvailabilityData, AvailabilityRecord};
pub use chat::ChatMessage;
pub use group::{Group, GroupSummary};
pub use scoring::{OptimalTimeSlot, ParticipationSummary};
pub use selection::{GestureKind, GridCell, GridLayout, SelectionMode, SelectionState};
pub use slot::{SlotEntry, TimeSlotKey};
pub use sync::{SyncNotice, SyncPhase, WriteOutcome};
