//! Per-date group chat

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slot::validate_date;
use crate::constants::MAX_CHAT_MESSAGE_LEN;
use crate::errors::{HuddleError, Result};

/// A chat message attached to one date of a group's calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub group_id: String,
    pub date: String,
    pub user_id: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Validated message stamped with the current time.
    pub fn new(
        group_id: impl Into<String>,
        date: &str,
        user_id: impl Into<String>,
        body: &str,
    ) -> Result<Self> {
        validate_date(date)?;
        let body = body.trim();
        if body.is_empty() {
            return Err(HuddleError::InvalidInput("message must not be empty".into()));
        }
        if body.chars().count() > MAX_CHAT_MESSAGE_LEN {
            return Err(HuddleError::InvalidInput(format!(
                "message longer than {MAX_CHAT_MESSAGE_LEN} characters"
            )));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            group_id: group_id.into(),
            date: date.to_string(),
            user_id: user_id.into(),
            body: body.to_string(),
            sent_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_body() {
        let msg = ChatMessage::new("g1", "2024-03-04", "alice", "  see you at 9 ").unwrap();
        assert_eq!(msg.body, "see you at 9");
    }

    #[test]
    fn rejects_blank_or_oversized_bodies() {
        assert!(ChatMessage::new("g1", "2024-03-04", "alice", "   ").is_err());
        let long = "a".repeat(MAX_CHAT_MESSAGE_LEN + 1);
        assert!(ChatMessage::new("g1", "2024-03-04", "alice", &long).is_err());
    }

    #[test]
    fn rejects_bad_date() {
        assert!(ChatMessage::new("g1", "someday", "alice", "hi").is_err());
    }
}
