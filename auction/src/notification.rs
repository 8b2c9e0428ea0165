//! Transaction-status banner shared by every dashboard flow.
//!
//! Only one notification is visible at a time. Showing a new one replaces the
//! current one, and a dismissal timer started for an older notification never
//! clears a newer one.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::config::STATUS_DISMISS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

struct Slot {
    generation: u64,
    tx: watch::Sender<Option<Notification>>,
}

/// Single-slot notification state with timed auto-dismiss.
///
/// Clones share the same slot.
#[derive(Clone)]
pub struct NotificationCenter {
    slot: Arc<Mutex<Slot>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            slot: Arc::new(Mutex::new(Slot { generation: 0, tx })),
        }
    }

    /// The notification currently visible, if any.
    pub fn current(&self) -> Option<Notification> {
        self.slot.lock().tx.borrow().clone()
    }

    /// Subscribe to changes of the visible notification.
    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.slot.lock().tx.subscribe()
    }

    /// Replace the visible notification.
    ///
    /// With `dismiss_after`, a timer clears it unless something newer has
    /// been shown by then. Returns the generation of this notification.
    pub fn show(&self, notification: Notification, dismiss_after: Option<Duration>) -> u64 {
        let generation = {
            let mut slot = self.slot.lock();
            slot.generation += 1;
            debug!("Notification {}: {:?}", slot.generation, notification);
            slot.tx.send_replace(Some(notification));
            slot.generation
        };

        if let Some(delay) = dismiss_after {
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let center = self.clone();
                    handle.spawn(async move {
                        tokio::time::sleep(delay).await;
                        center.dismiss_if_current(generation);
                    });
                }
                Err(_) => warn!("No async runtime; notification will not auto-dismiss"),
            }
        }

        generation
    }

    /// Pending notifications stay until replaced.
    pub fn pending(&self, message: impl Into<String>) -> u64 {
        self.show(
            Notification {
                kind: NotificationKind::Pending,
                message: message.into(),
            },
            None,
        )
    }

    pub fn success(&self, message: impl Into<String>, dismiss_after: Duration) -> u64 {
        self.show(
            Notification {
                kind: NotificationKind::Success,
                message: message.into(),
            },
            Some(dismiss_after),
        )
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.show(
            Notification {
                kind: NotificationKind::Error,
                message: message.into(),
            },
            Some(STATUS_DISMISS),
        )
    }

    /// Clear the slot only if `generation` is still the visible notification.
    ///
    /// Returns `true` if it was cleared.
    pub fn dismiss_if_current(&self, generation: u64) -> bool {
        let slot = self.slot.lock();
        if slot.generation != generation {
            return false;
        }
        slot.tx.send_replace(None).is_some()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}
