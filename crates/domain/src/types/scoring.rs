//! Derived scoring results (never persisted)

use serde::{Deserialize, Serialize};

use super::slot::TimeSlotKey;

/// One candidate slot with the respondents split by availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimalTimeSlot {
    pub time_slot: TimeSlotKey,
    pub available_user_ids: Vec<String>,
    pub conflicting_user_ids: Vec<String>,
    /// `available / respondents`, `0.0` when nobody responded
    pub score: f64,
}

impl OptimalTimeSlot {
    /// Members available for the slot.
    pub fn available_count(&self) -> usize {
        self.available_user_ids.len()
    }

    /// Available plus conflicting members.
    pub fn total_respondents(&self) -> usize {
        self.available_user_ids.len() + self.conflicting_user_ids.len()
    }
}

/// Aggregate participation for a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationSummary {
    pub total_participants: usize,
    pub responded_count: usize,
    pub response_rate: f64,
    pub most_popular_slots: Vec<OptimalTimeSlot>,
    pub least_popular_slots: Vec<OptimalTimeSlot>,
}

impl ParticipationSummary {
    /// Response rate as a whole percentage.
    pub fn response_percent(&self) -> u32 {
        (self.response_rate * 100.0).round() as u32
    }
}
