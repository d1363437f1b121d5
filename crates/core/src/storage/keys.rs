//! Storage key layout shared by the remote and local stores

use std::fmt;

/// Logical document address.
///
/// Both stores are keyed identically so a local mirror entry can always be
/// found from the remote key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// One member's availability in a group
    Availability { group_id: String, user_id: String },
    /// Group document by id
    Group(String),
    /// Invite code → group id
    GroupCode(String),
    /// Normalised group name → group id
    GroupName(String),
    /// User id → list of group summaries
    UserGroups(String),
    /// A group's chat thread for one date
    Chat { group_id: String, date: String },
}

impl StorageKey {
    /// Key of one member's availability in a group.
    pub fn availability(group_id: &str, user_id: &str) -> Self {
        Self::Availability { group_id: group_id.to_string(), user_id: user_id.to_string() }
    }

    /// Key of a group's chat thread for one date.
    pub fn chat(group_id: &str, date: &str) -> Self {
        Self::Chat { group_id: group_id.to_string(), date: date.to_string() }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Availability { group_id, user_id } => {
                write!(f, "availability/{group_id}/{user_id}")
            }
            Self::Group(id) => write!(f, "groups/{id}"),
            Self::GroupCode(code) => write!(f, "group_codes/{code}"),
            Self::GroupName(name) => write!(f, "group_names/{name}"),
            Self::UserGroups(user_id) => write!(f, "user_groups/{user_id}"),
            Self::Chat { group_id, date } => write!(f, "chat/{group_id}/{date}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_is_keyed_by_group_then_user() {
        assert_eq!(StorageKey::availability("g1", "alice").to_string(), "availability/g1/alice");
    }

    #[test]
    fn chat_is_keyed_by_date() {
        assert_eq!(StorageKey::chat("g1", "2024-03-04").to_string(), "chat/g1/2024-03-04");
    }
}
