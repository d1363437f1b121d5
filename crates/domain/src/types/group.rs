//! Group and membership types

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{GROUP_CODE_ALPHABET, GROUP_CODE_LEN, MAX_GROUP_NAME_LEN};
use crate::errors::{HuddleError, Result};

/// A scheduling group.
///
/// `member_ids` is the membership set enumerated by aggregation; each member
/// owns exactly one availability record for this group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub code: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub member_ids: Vec<String>,
}

impl Group {
    /// Create a group with a fresh id and invite code. The creator is the
    /// first member.
    pub fn new(name: &str, created_by: impl Into<String>) -> Result<Self> {
        let name = validate_group_name(name)?;
        let created_by = created_by.into();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name,
            code: generate_group_code(),
            member_ids: vec![created_by.clone()],
            created_by,
            created_at: Utc::now(),
        })
    }

    /// Add a member; returns `false` if already present.
    pub fn add_member(&mut self, user_id: &str) -> bool {
        if self.is_member(user_id) {
            return false;
        }
        self.member_ids.push(user_id.to_string());
        true
    }

    /// Remove a member; returns `false` if absent.
    pub fn remove_member(&mut self, user_id: &str) -> bool {
        let before = self.member_ids.len();
        self.member_ids.retain(|id| id != user_id);
        before != self.member_ids.len()
    }

    /// Whether `user_id` belongs to the group.
    pub fn is_member(&self, user_id: &str) -> bool {
        self.member_ids.iter().any(|id| id == user_id)
    }

    /// Key under which the name is reserved in the name index.
    pub fn name_key(&self) -> String {
        normalize_group_name(&self.name)
    }

    /// Index entry for the user-groups list.
    pub fn summary(&self) -> GroupSummary {
        GroupSummary { id: self.id.clone(), name: self.name.clone(), code: self.code.clone() }
    }
}

/// Entry in a user's group list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub id: String,
    pub name: String,
    pub code: String,
}

/// Trim and length-check a group name.
pub fn validate_group_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(HuddleError::InvalidInput("group name must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_GROUP_NAME_LEN {
        return Err(HuddleError::InvalidInput(format!(
            "group name longer than {MAX_GROUP_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Case- and whitespace-insensitive form used for duplicate detection.
pub fn normalize_group_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Upper-case and validate an invite code typed by a user.
pub fn normalize_group_code(code: &str) -> Result<String> {
    let code = code.trim().to_ascii_uppercase();
    if code.len() != GROUP_CODE_LEN || !code.bytes().all(|b| GROUP_CODE_ALPHABET.contains(&b)) {
        return Err(HuddleError::InvalidInput(format!("malformed group code: {code}")));
    }
    Ok(code)
}

/// Random invite code from the unambiguous alphabet.
pub fn generate_group_code() -> String {
    let mut rng = rand::thread_rng();
    (0..GROUP_CODE_LEN)
        .map(|_| char::from(GROUP_CODE_ALPHABET[rng.gen_range(0..GROUP_CODE_ALPHABET.len())]))
        .collect()
}
