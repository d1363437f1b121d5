//! Dual-write bookkeeping types

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Phase of a single dual-write or fallback read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    /// Nothing in flight
    Idle,
    /// Waiting on the remote store
    RemoteAttempt,
    /// Remote call returned in time
    RemoteSucceeded,
    /// Remote call failed or timed out
    RemoteFailed,
    /// Reading or writing the local mirror
    LocalMirror,
    /// Operation finished
    Done,
}

impl_domain_status_conversions!(SyncPhase {
    Idle => "idle",
    RemoteAttempt => "remote_attempt",
    RemoteSucceeded => "remote_succeeded",
    RemoteFailed => "remote_failed",
    LocalMirror => "local_mirror",
    Done => "done",
});

/// Result of a mutation that reached at least the local mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    /// Written to the remote store and mirrored locally
    Synced,
    /// Remote write failed; only the local mirror holds the change
    LocalOnly,
}

impl_domain_status_conversions!(WriteOutcome {
    Synced => "synced",
    LocalOnly => "local_only",
});

/// User-facing notice published by the sync layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyncNotice {
    /// A write reached the remote store
    Saved { operation: String },
    /// A write was kept locally because the remote store was unavailable
    OfflineFallback { operation: String, reason: String },
    /// A read was served from the local mirror and may be stale
    StaleRead { operation: String, reason: String },
}
