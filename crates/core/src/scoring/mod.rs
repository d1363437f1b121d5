//! Optimal-slot scoring across a group's availability records

pub(crate) mod engine;

pub use engine::{candidate_slots, ScoringEngine};
