use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};

use crate::error::{AuctionError, AuctionResult};

/// AES-256-GCM key (32 bytes)
pub type ContentKey = [u8; 32];

/// AES-256-GCM nonce (12 bytes)
pub type ContentNonce = [u8; 12];

/// Generate a random AES-256 key
pub fn generate_key() -> ContentKey {
    Aes256Gcm::generate_key(&mut OsRng).into()
}

/// Encrypt bytes with AES-256-GCM under the caller-supplied nonce.
/// A nonce must never be reused with the same key.
pub fn encrypt_bytes(
    plaintext: &[u8],
    key: &ContentKey,
    nonce: &ContentNonce,
) -> AuctionResult<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.into());
    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|e| AuctionError::Crypto(format!("Encryption failed: {e}")))
}

/// Decrypt AES-256-GCM ciphertext, verifying its authentication tag.
pub fn decrypt_bytes(
    ciphertext: &[u8],
    key: &ContentKey,
    nonce: &ContentNonce,
) -> AuctionResult<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.into());
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|e| AuctionError::Crypto(format!("Decryption failed: {e}")))
}
