//! Debounced availability autosave
//!
//! Rapid edits collapse into a single write of the latest record once the
//! user pauses. A write that has already started is never cancelled.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use huddle_domain::{AvailabilityRecord, Result, SyncConfig, WriteOutcome};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use super::coordinator::DualWriteCoordinator;

struct PendingSave {
    record: AvailabilityRecord,
    generation: u64,
    timer: JoinHandle<()>,
}

/// Debounces [`DualWriteCoordinator::save_availability`].
pub struct Autosaver {
    coordinator: Arc<DualWriteCoordinator>,
    debounce: Duration,
    pending: Arc<Mutex<Option<PendingSave>>>,
    generation: AtomicU64,
}

impl Autosaver {
    /// Autosaver debouncing by `config.autosave_debounce_ms`.
    pub fn new(coordinator: Arc<DualWriteCoordinator>, config: &SyncConfig) -> Self {
        Self {
            coordinator,
            debounce: config.autosave_debounce(),
            pending: Arc::new(Mutex::new(None)),
            generation: AtomicU64::new(0),
        }
    }

    /// Replace any pending save with `record` and restart the quiet period.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, record: AvailabilityRecord) {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let mut pending = self.pending.lock();

        if let Some(previous) = pending.take() {
            previous.timer.abort();
            debug!(superseded = previous.generation, generation, "autosave rescheduled");
        }

        let timer = tokio::spawn(fire_after(
            Arc::clone(&self.coordinator),
            Arc::clone(&self.pending),
            self.debounce,
            generation,
        ));
        *pending = Some(PendingSave { record, generation, timer });
    }

    /// Write the pending record now, if there is one.
    pub async fn flush(&self) -> Result<Option<WriteOutcome>> {
        let pending = self.pending.lock().take();
        let Some(pending) = pending else {
            return Ok(None);
        };

        pending.timer.abort();
        debug!(generation = pending.generation, "flushing autosave");
        self.coordinator.save_availability(&pending.record).await.map(Some)
    }

    /// Whether a save is waiting for its timer.
    pub fn has_pending(&self) -> bool {
        self.pending.lock().is_some()
    }
}

impl Drop for Autosaver {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.lock().take() {
            pending.timer.abort();
            debug!(generation = pending.generation, "unsaved autosave dropped");
        }
    }
}

async fn fire_after(
    coordinator: Arc<DualWriteCoordinator>,
    pending: Arc<Mutex<Option<PendingSave>>>,
    debounce: Duration,
    generation: u64,
) {
    tokio::time::sleep(debounce).await;

    // A newer schedule or a flush may have claimed the slot meanwhile.
    let record = {
        let mut slot = pending.lock();
        let claimed = slot.as_ref().is_some_and(|current| current.generation == generation);
        if claimed {
            slot.take().map(|claimed| claimed.record)
        } else {
            None
        }
    };
    let Some(record) = record else {
        return;
    };

    if let Err(err) = coordinator.save_availability(&record).await {
        error!(
            group_id = %record.group_id(),
            user_id = %record.user_id(),
            error = %err,
            "autosave failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use huddle_domain::HuddleError;
    use serde_json::Value;

    use super::*;
    use crate::storage::{DocumentStore, InMemoryDocumentStore};
    use crate::sync::NotificationChannel;

    #[derive(Default)]
    struct CountingStore {
        inner: InMemoryDocumentStore,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl DocumentStore for CountingStore {
        async fn get(&self, key: &str) -> Result<Option<Value>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: Value) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.set(key, value).await
        }

        async fn remove(&self, _key: &str) -> Result<()> {
            Err(HuddleError::Internal("not used".into()))
        }
    }

    fn autosaver(remote: Arc<CountingStore>) -> Autosaver {
        let coordinator = DualWriteCoordinator::new(
            remote,
            Arc::new(InMemoryDocumentStore::new()),
            &SyncConfig::default(),
            NotificationChannel::default(),
        );
        Autosaver::new(Arc::new(coordinator), &SyncConfig::default())
    }

    fn record_with(hours: &[u32]) -> AvailabilityRecord {
        let mut record = AvailabilityRecord::new("alice", "g1");
        for hour in hours {
            record.set_slot("2024-03-04", *hour, true).unwrap();
        }
        record
    }

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_into_one_write_of_latest_state() {
        let remote = Arc::new(CountingStore::default());
        let saver = autosaver(Arc::clone(&remote));

        saver.schedule(record_with(&[9]));
        tokio::time::sleep(Duration::from_millis(100)).await;
        saver.schedule(record_with(&[9, 10]));
        tokio::time::sleep(Duration::from_millis(100)).await;
        saver.schedule(record_with(&[9, 10, 11]));
        assert!(saver.has_pending());

        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(remote.writes.load(Ordering::SeqCst), 1);
        assert!(!saver.has_pending());
        let stored = remote.inner.get("availability/g1/alice").await.unwrap().unwrap();
        assert_eq!(stored["slots"].as_array().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn flush_writes_immediately_and_cancels_timer() {
        let remote = Arc::new(CountingStore::default());
        let saver = autosaver(Arc::clone(&remote));

        saver.schedule(record_with(&[9]));
        let outcome = saver.flush().await.unwrap();
        assert_eq!(outcome, Some(WriteOutcome::Synced));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(remote.writes.load(Ordering::SeqCst), 1);
        assert_eq!(saver.flush().await.unwrap(), None);
    }
}
