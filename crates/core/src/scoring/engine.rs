//! Slot scoring engine
//!
//! For every candidate slot the respondents are split into those available
//! and those not; the score is the available fraction. Ranking is by score,
//! then chronologically so equal scores always come out in the same order.

use std::cmp::Ordering;

use huddle_domain::{AvailabilityRecord, Group, OptimalTimeSlot, Result, ScoringConfig, TimeSlotKey};
use tracing::debug;

/// Scores candidate slots against a set of availability records.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    /// Engine using `config` thresholds.
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Active thresholds.
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score every candidate against the given respondents and rank the
    /// result best-first.
    ///
    /// With no respondents every slot scores `0.0`.
    pub fn score_slots(
        &self,
        candidates: &[TimeSlotKey],
        responses: &[AvailabilityRecord],
    ) -> Vec<OptimalTimeSlot> {
        let mut scored: Vec<OptimalTimeSlot> =
            candidates.iter().map(|slot| score_slot(slot, responses)).collect();
        rank(&mut scored);
        scored
    }

    /// Score a group with one respondent per member.
    ///
    /// Members without a loaded record count as unavailable everywhere;
    /// records from non-members are ignored.
    pub fn score_group(
        &self,
        group: &Group,
        records: &[AvailabilityRecord],
        candidates: &[TimeSlotKey],
    ) -> Vec<OptimalTimeSlot> {
        let respondents = member_records(group, records);
        self.score_slots(candidates, &respondents)
    }

    /// Slots worth proposing: score at or above the threshold with enough
    /// people available. Keeps the ranked order.
    pub fn best_meeting_times(&self, scored: &[OptimalTimeSlot]) -> Vec<OptimalTimeSlot> {
        scored
            .iter()
            .filter(|slot| {
                slot.score >= self.config.best_score_threshold
                    && slot.available_count() >= self.config.minimum_participants
            })
            .cloned()
            .collect()
    }
}

/// One record per group member, in membership order.
pub(crate) fn member_records(
    group: &Group,
    records: &[AvailabilityRecord],
) -> Vec<AvailabilityRecord> {
    let ignored = records.iter().filter(|record| !group.is_member(record.user_id())).count();
    if ignored > 0 {
        debug!(group_id = %group.id, ignored, "ignoring records from non-members");
    }

    group
        .member_ids
        .iter()
        .map(|member| {
            records
                .iter()
                .find(|record| record.user_id() == member && record.group_id() == group.id)
                .cloned()
                .unwrap_or_else(|| AvailabilityRecord::new(member.as_str(), group.id.as_str()))
        })
        .collect()
}

fn score_slot(slot: &TimeSlotKey, responses: &[AvailabilityRecord]) -> OptimalTimeSlot {
    let (available, conflicting): (Vec<&AvailabilityRecord>, Vec<&AvailabilityRecord>) =
        responses.iter().partition(|record| record.is_available(slot));

    let score = if responses.is_empty() {
        0.0
    } else {
        available.len() as f64 / responses.len() as f64
    };

    OptimalTimeSlot {
        time_slot: slot.clone(),
        available_user_ids: available.iter().map(|r| r.user_id().to_string()).collect(),
        conflicting_user_ids: conflicting.iter().map(|r| r.user_id().to_string()).collect(),
        score,
    }
}

fn rank(slots: &mut [OptimalTimeSlot]) {
    slots.sort_by(|a, b| match b.score.total_cmp(&a.score) {
        Ordering::Equal => a.time_slot.cmp(&b.time_slot),
        other => other,
    });
}

/// Candidate grid for a visible range: every hour of every date.
pub fn candidate_slots(dates: &[String], hours: &[u32]) -> Result<Vec<TimeSlotKey>> {
    let mut slots = Vec::with_capacity(dates.len() * hours.len());
    for date in dates {
        for hour in hours {
            slots.push(TimeSlotKey::new(date.as_str(), *hour)?);
        }
    }
    Ok(slots)
}
