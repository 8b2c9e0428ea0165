//! Random source abstraction for testable bid id generation.

use rand::RngCore;

const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Trait for providing random bytes.
pub trait RandomSource: Send + Sync {
    /// Fill the destination buffer with random bytes.
    fn fill_bytes(&self, dest: &mut [u8]);

    /// Generate `len` lowercase base36 characters.
    fn base36_suffix(&self, len: usize) -> String {
        let mut bytes = vec![0u8; len];
        self.fill_bytes(&mut bytes);
        bytes
            .iter()
            .map(|b| BASE36_ALPHABET[usize::from(*b) % BASE36_ALPHABET.len()] as char)
            .collect()
    }
}

/// Production implementation using the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRng;

impl RandomSource for ThreadRng {
    fn fill_bytes(&self, dest: &mut [u8]) {
        rand::thread_rng().fill_bytes(dest);
    }
}

impl ThreadRng {
    pub const fn new() -> Self {
        Self
    }
}
