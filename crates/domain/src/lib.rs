//! # Huddle Domain
//!
//! Business domain types and models for Huddle.
//!
//! This crate contains:
//! - Availability data types (TimeSlotKey, AvailabilityRecord, etc.)
//! - Group, membership and chat models
//! - Derived scoring types (OptimalTimeSlot, ParticipationSummary)
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other Huddle crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
