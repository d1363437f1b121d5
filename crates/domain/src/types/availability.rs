//! Per-user availability for one group
//!
//! Slots live in a map keyed by `(date, hour)`, so a record can never hold two
//! entries for the same slot. An absent slot reads as "not available".

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::slot::{validate_date, validate_hour, SlotEntry, TimeSlotKey};
use crate::errors::{HuddleError, Result};

/// Availability owned by one `(user_id, group_id)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityRecord {
    user_id: String,
    group_id: String,
    slots: BTreeMap<TimeSlotKey, bool>,
    updated_at: DateTime<Utc>,
}

impl AvailabilityRecord {
    /// Create an empty record, as done when a user creates or joins a group.
    pub fn new(user_id: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            group_id: group_id.into(),
            slots: BTreeMap::new(),
            updated_at: Utc::now(),
        }
    }

    /// Owner of the record.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Group the record belongs to.
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Time of the last slot change.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Upsert one slot.
    ///
    /// # Errors
    /// Returns `HuddleError::InvalidInput` for a malformed date or an hour
    /// outside `0..=23`; the record is left untouched.
    pub fn set_slot(&mut self, date: &str, hour: u32, available: bool) -> Result<()> {
        let key = TimeSlotKey::new(date, hour)?;
        self.slots.insert(key, available);
        self.touch();
        Ok(())
    }

    /// `false` when no entry exists.
    pub fn get_slot(&self, date: &str, hour: u32) -> bool {
        self.slots
            .get(&TimeSlotKey { date: date.to_string(), hour })
            .copied()
            .unwrap_or(false)
    }

    /// Whether the slot is marked available.
    pub fn is_available(&self, key: &TimeSlotKey) -> bool {
        self.slots.get(key).copied().unwrap_or(false)
    }

    /// Flip one slot and return its new value.
    pub fn toggle_slot(&mut self, date: &str, hour: u32) -> Result<bool> {
        let next = !self.get_slot(date, hour);
        self.set_slot(date, hour, next)?;
        Ok(next)
    }

    /// Remove every entry for `date`.
    pub fn clear_day(&mut self, date: &str) {
        self.slots.retain(|key, _| key.date != date);
        self.touch();
    }

    /// Replace a day's availability with the hours `start_hour..end_hour`.
    ///
    /// The day is cleared first, so applying the same range twice yields the
    /// same record contents.
    pub fn apply_hour_range(&mut self, date: &str, start_hour: u32, end_hour: u32) -> Result<()> {
        validate_date(date)?;
        validate_hour(start_hour)?;
        if end_hour > 24 || end_hour <= start_hour {
            return Err(HuddleError::InvalidInput(format!(
                "invalid hour range {start_hour}..{end_hour}"
            )));
        }

        self.clear_day(date);
        for hour in start_hour..end_hour {
            self.slots.insert(TimeSlotKey { date: date.to_string(), hour }, true);
        }
        self.touch();
        Ok(())
    }

    /// Keys marked available, in chronological order.
    pub fn available_slots(&self) -> impl Iterator<Item = &TimeSlotKey> {
        self.slots.iter().filter(|(_, available)| **available).map(|(key, _)| key)
    }

    /// Whether the owner has marked at least one slot available.
    pub fn has_responded(&self) -> bool {
        self.slots.values().any(|available| *available)
    }

    /// Stored slots, available or not.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// No slots stored.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Plain-data projection for storage.
    pub fn to_data(&self) -> AvailabilityData {
        AvailabilityData {
            user_id: self.user_id.clone(),
            group_id: self.group_id.clone(),
            slots: self
                .slots
                .iter()
                .map(|(key, available)| SlotEntry {
                    date: key.date.clone(),
                    hour: key.hour,
                    available: *available,
                })
                .collect(),
            updated_at: self.updated_at,
        }
    }

    /// Single entry point for data coming back from storage.
    ///
    /// Duplicate `(date, hour)` entries resolve last-write-wins; entries with a
    /// malformed date or an out-of-range hour are dropped.
    pub fn from_data(data: AvailabilityData) -> Self {
        let mut slots = BTreeMap::new();
        for entry in data.slots {
            if let Ok(key) = TimeSlotKey::new(entry.date, entry.hour) {
                slots.insert(key, entry.available);
            }
        }

        Self { user_id: data.user_id, group_id: data.group_id, slots, updated_at: data.updated_at }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Storage form of an [`AvailabilityRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityData {
    pub user_id: String,
    pub group_id: String,
    #[serde(default)]
    pub slots: Vec<SlotEntry>,
    pub updated_at: DateTime<Utc>,
}
