use data_encoding::BASE64;
use serde::{Deserialize, Serialize};

use super::content::{decrypt_bytes, encrypt_bytes, generate_key, ContentKey, ContentNonce};
use crate::config::MAX_STORE_VALUE_SIZE;
use crate::error::{AuctionError, AuctionResult};

const AES_PREFIX: &str = "AESGCM-";
const PLACEHOLDER_PREFIX: &str = "FHE-";

/// Private bid details carried inside `encryptedBid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedBidPayload {
    pub amount: String,
    pub note: String,
    /// Milliseconds since the Unix epoch at sealing time.
    pub timestamp: u64,
}

/// Scheme a sealed string was produced with, detected from its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SealingScheme {
    AesGcm,
    Placeholder,
}

impl SealingScheme {
    pub fn detect(sealed: &str) -> Option<Self> {
        if sealed.starts_with(AES_PREFIX) {
            Some(Self::AesGcm)
        } else if sealed.starts_with(PLACEHOLDER_PREFIX) {
            Some(Self::Placeholder)
        } else {
            None
        }
    }

    /// Whether the scheme actually hides the bid details.
    pub const fn is_private(self) -> bool {
        matches!(self, Self::AesGcm)
    }
}

/// Turns private bid details into the opaque `encryptedBid` string and back.
pub trait BidSealer: Send + Sync {
    fn scheme(&self) -> SealingScheme;

    fn seal(&self, payload: &SealedBidPayload) -> AuctionResult<String>;

    fn open(&self, sealed: &str) -> AuctionResult<SealedBidPayload>;
}

/// AES-256-GCM sealing. Format: `AESGCM-{hex nonce}:{base64 ciphertext}`.
pub struct AesGcmSealer {
    key: ContentKey,
}

impl AesGcmSealer {
    pub const fn new(key: ContentKey) -> Self {
        Self { key }
    }

    /// Sealer with a freshly generated key.
    pub fn generate() -> Self {
        Self::new(generate_key())
    }
}

impl BidSealer for AesGcmSealer {
    fn scheme(&self) -> SealingScheme {
        SealingScheme::AesGcm
    }

    fn seal(&self, payload: &SealedBidPayload) -> AuctionResult<String> {
        let plaintext = crate::util::json_to_vec(payload)?;
        let nonce: ContentNonce = rand::random();
        let ciphertext = encrypt_bytes(&plaintext, &self.key, &nonce)?;
        Ok(format!(
            "{AES_PREFIX}{}:{}",
            hex::encode(nonce),
            BASE64.encode(&ciphertext)
        ))
    }

    fn open(&self, sealed: &str) -> AuctionResult<SealedBidPayload> {
        let body = sealed
            .strip_prefix(AES_PREFIX)
            .ok_or_else(|| AuctionError::Crypto("Not an AES-GCM sealed bid".to_string()))?;
        let (nonce_hex, ciphertext_b64) = body
            .split_once(':')
            .ok_or_else(|| AuctionError::Crypto("Sealed bid is missing its nonce".to_string()))?;

        let nonce_bytes = hex::decode(nonce_hex)
            .map_err(|e| AuctionError::Crypto(format!("Invalid nonce encoding: {e}")))?;
        let nonce = ContentNonce::try_from(nonce_bytes.as_slice())
            .map_err(|_| AuctionError::Crypto("Nonce must be 12 bytes".to_string()))?;
        let ciphertext = BASE64
            .decode(ciphertext_b64.as_bytes())
            .map_err(|e| AuctionError::Crypto(format!("Invalid ciphertext encoding: {e}")))?;

        let plaintext = decrypt_bytes(&ciphertext, &self.key, &nonce)?;
        crate::util::json_from_limited_slice(&plaintext, MAX_STORE_VALUE_SIZE)
    }
}

/// Base64 JSON encoding used by the legacy web client: `FHE-{base64 json}`.
///
/// Anyone can decode it. It is kept only so records from that client stay
/// readable and so the dashboard can interoperate with it when asked to.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderSealer;

impl BidSealer for PlaceholderSealer {
    fn scheme(&self) -> SealingScheme {
        SealingScheme::Placeholder
    }

    fn seal(&self, payload: &SealedBidPayload) -> AuctionResult<String> {
        let json = crate::util::json_to_vec(payload)?;
        Ok(format!("{PLACEHOLDER_PREFIX}{}", BASE64.encode(&json)))
    }

    fn open(&self, sealed: &str) -> AuctionResult<SealedBidPayload> {
        let body = sealed
            .strip_prefix(PLACEHOLDER_PREFIX)
            .ok_or_else(|| AuctionError::Crypto("Not a placeholder sealed bid".to_string()))?;
        let json = BASE64
            .decode(body.as_bytes())
            .map_err(|e| AuctionError::Crypto(format!("Invalid base64: {e}")))?;
        crate::util::json_from_limited_slice(&json, MAX_STORE_VALUE_SIZE)
    }
}
