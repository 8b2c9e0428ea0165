//! Mock random source for deterministic testing.

use crate::traits::RandomSource;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Deterministic byte stream derived from a seed and a shared counter.
#[derive(Debug, Clone)]
pub struct MockRandom {
    counter: Arc<AtomicU64>,
    seed: u64,
}

impl MockRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            counter: Arc::new(AtomicU64::new(0)),
            seed,
        }
    }

    /// Rewind so the same sequence is produced again.
    pub fn reset(&self) {
        self.counter.store(0, Ordering::SeqCst);
    }

    const fn mix(&self, counter: u64) -> u64 {
        let mut x = self.seed ^ counter.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        x ^= x >> 30;
        x = x.wrapping_mul(0xBF58_476D_1CE4_E5B9);
        x ^= x >> 27;
        x = x.wrapping_mul(0x94D0_49BB_1331_11EB);
        x ^ (x >> 31)
    }
}

impl Default for MockRandom {
    fn default() -> Self {
        Self::new(0x5EED)
    }
}

impl RandomSource for MockRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let counter = self.counter.fetch_add(1, Ordering::SeqCst);
            let bytes = self.mix(counter).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
