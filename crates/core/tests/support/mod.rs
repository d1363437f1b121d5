//! Shared test helpers for `huddle-core` integration tests.
//!
//! These helpers provide scripted document stores so that coordinator tests
//! can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod stores;

use std::sync::Arc;

use huddle_core::{DualWriteCoordinator, NotificationChannel};
use huddle_domain::SyncConfig;

pub use stores::ScriptedStore;

/// Coordinator wired to two scripted stores.
pub struct Harness {
    pub remote: ScriptedStore,
    pub local: ScriptedStore,
    pub coordinator: Arc<DualWriteCoordinator>,
}

impl Harness {
    pub fn new() -> Self {
        let remote = ScriptedStore::new();
        let local = ScriptedStore::new();
        let coordinator = DualWriteCoordinator::new(
            Arc::new(remote.clone()),
            Arc::new(local.clone()),
            &SyncConfig::default(),
            NotificationChannel::default(),
        );
        Self { remote, local, coordinator: Arc::new(coordinator) }
    }

    /// Another device sharing the same remote store with its own mirror.
    pub fn other_device(&self) -> DualWriteCoordinator {
        DualWriteCoordinator::new(
            Arc::new(self.remote.clone()),
            Arc::new(ScriptedStore::new()),
            &SyncConfig::default(),
            NotificationChannel::default(),
        )
    }
}
