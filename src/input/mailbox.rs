//! Hand-off between the input listener and the simulation driver.

use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Notify, watch};

use crate::game::Direction;

#[derive(Debug, Default)]
struct Slot {
    intent: Mutex<Option<Direction>>,
    notify: Notify,
}

/// Single-slot mailbox for movement intents.
///
/// Posting overwrites whatever was waiting, so the driver only ever sees the
/// newest intent.
#[derive(Debug, Clone, Default)]
pub struct IntentMailbox {
    slot: Arc<Slot>,
}

impl IntentMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&self, direction: Direction) {
        *self
            .slot
            .intent
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(direction);
        self.slot.notify.notify_one();
    }

    /// Remove the waiting intent without blocking
    pub fn take(&self) -> Option<Direction> {
        self.slot
            .intent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Resolves after the next post. The slot may already be empty by then if
    /// a tick consumed the intent first.
    pub async fn posted(&self) {
        self.slot.notify.notified().await
    }
}

/// Stop flag shared by every loop of a session
#[derive(Debug, Clone)]
pub struct StopSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl StopSignal {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once [`StopSignal::stop`] has been called
    pub async fn stopped(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in self, so the channel cannot close here
        let _ = rx.wait_for(|stopped| *stopped).await;
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_latest_intent_wins() {
        let mailbox = IntentMailbox::new();
        mailbox.post(Direction::Up);
        mailbox.post(Direction::Left);

        assert_eq!(mailbox.take(), Some(Direction::Left));
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn test_clones_share_the_slot() {
        let mailbox = IntentMailbox::new();
        let sender = mailbox.clone();
        sender.post(Direction::Down);

        assert_eq!(mailbox.take(), Some(Direction::Down));
    }

    #[tokio::test]
    async fn test_posted_wakes_after_post() {
        let mailbox = IntentMailbox::new();
        let sender = mailbox.clone();

        let waiter = tokio::spawn(async move {
            mailbox.posted().await;
            mailbox.take()
        });
        sender.post(Direction::Right);

        let received = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(received, Some(Direction::Right));
    }

    #[tokio::test]
    async fn test_stop_signal() {
        let stop = StopSignal::new();
        assert!(!stop.is_stopped());

        let watcher = stop.clone();
        let waiter = tokio::spawn(async move { watcher.stopped().await });
        stop.stop();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert!(stop.is_stopped());

        // Already stopped resolves immediately
        stop.stopped().await;
    }
}
