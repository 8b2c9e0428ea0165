//! Mock time provider for testing.

use crate::traits::TimeProvider;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Mock clock with millisecond resolution. Clones share the same clock.
#[derive(Debug, Clone)]
pub struct MockTime {
    current_millis: Arc<AtomicU64>,
}

impl MockTime {
    /// Create a mock clock starting at the given Unix timestamp in seconds.
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current_millis: Arc::new(AtomicU64::new(initial_secs * 1000)),
        }
    }

    /// Start at 2024-01-01 00:00:00 UTC.
    pub fn default_time() -> Self {
        Self::new(1_704_067_200)
    }

    pub fn set_secs(&self, secs: u64) {
        self.current_millis.store(secs * 1000, Ordering::SeqCst);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.current_millis.fetch_add(secs * 1000, Ordering::SeqCst);
    }

    pub fn advance_millis(&self, millis: u64) {
        self.current_millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Default for MockTime {
    fn default() -> Self {
        Self::default_time()
    }
}

impl TimeProvider for MockTime {
    fn now_millis(&self) -> u64 {
        self.current_millis.load(Ordering::SeqCst)
    }
}
