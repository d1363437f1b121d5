//! Broadcast channel for user-facing sync notices

use huddle_domain::SyncNotice;
use tokio::sync::broadcast;
use tracing::trace;

const DEFAULT_CAPACITY: usize = 32;

/// Fan-out of [`SyncNotice`]s to whoever is listening (toasts, status bars).
///
/// Cloning shares the underlying channel.
#[derive(Debug, Clone)]
pub struct NotificationChannel {
    sender: broadcast::Sender<SyncNotice>,
}

impl NotificationChannel {
    /// Channel buffering up to `capacity` notices per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Receive notices published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncNotice> {
        self.sender.subscribe()
    }

    /// Publish to current subscribers; returns how many received it.
    pub fn publish(&self, notice: SyncNotice) -> usize {
        match self.sender.send(notice) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(notice)) => {
                trace!(?notice, "no subscribers for sync notice");
                0
            }
        }
    }
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
