//! Sealing of private bid details.
//!
//! Bid amounts and notes are sealed with AES-256-GCM before they reach the
//! store. This is ordinary authenticated encryption held by the bidder, not
//! homomorphic encryption: nothing can compute over a sealed bid without the
//! key. A base64 placeholder scheme remains for reading and writing records
//! produced by the legacy web client, and offers no privacy at all.

pub mod content;
pub mod sealing;

pub use content::{decrypt_bytes, encrypt_bytes, generate_key, ContentKey, ContentNonce};
pub use sealing::{AesGcmSealer, BidSealer, PlaceholderSealer, SealedBidPayload, SealingScheme};
