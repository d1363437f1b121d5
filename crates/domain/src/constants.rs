//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Calendar grid
/// Hour rows in a full day.
pub const HOURS_PER_DAY: u32 = 24;
/// Largest valid slot hour.
pub const MAX_HOUR: u32 = HOURS_PER_DAY - 1;
/// `chrono` format of slot dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// Groups
/// Longest group name, in characters, after trimming.
pub const MAX_GROUP_NAME_LEN: usize = 50;
/// Length of an invite code.
pub const GROUP_CODE_LEN: usize = 6;
/// Invite code characters; excludes I, O, 0 and 1.
pub const GROUP_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

// Chat
/// Longest chat message, in characters.
pub const MAX_CHAT_MESSAGE_LEN: usize = 1000;

// Sync
/// Default quiet period before an autosave.
pub const DEFAULT_AUTOSAVE_DEBOUNCE_MS: u64 = 500;
/// Default bound on one remote call.
pub const DEFAULT_REMOTE_TIMEOUT_MS: u64 = 8_000;

// Selection gestures (~20 updates per second)
/// Default gap between selection recomputes.
pub const DEFAULT_UPDATE_THROTTLE_MS: u64 = 50;
/// Movement below which a gesture counts as a tap.
pub const DEFAULT_TAP_THRESHOLD_PX: f64 = 10.0;

// Scoring and summaries
/// Default score a slot needs to count as a best time.
pub const DEFAULT_BEST_SCORE_THRESHOLD: f64 = 0.5;
/// Default available members a best time needs.
pub const DEFAULT_MINIMUM_PARTICIPANTS: usize = 1;
/// Default length of the most and least popular lists.
pub const DEFAULT_POPULAR_SLOTS_LIMIT: usize = 5;
/// Default number of slots listed in share text.
pub const DEFAULT_SHARE_TOP_SLOTS: usize = 3;
