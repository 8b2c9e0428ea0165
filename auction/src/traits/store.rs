//! Key/value store abstraction over the auction contract.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Receipt returned once a write has been accepted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Store-assigned transaction identifier.
    pub tx_id: String,
    /// Number of keys written by the transaction.
    pub keys_written: usize,
}

/// Raised by a store when the signer declines a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("user rejected transaction")]
pub struct StoreRejection;

/// Value a key must still hold for a conditional write to apply.
///
/// A missing key reads as empty, so `expected: vec![]` also matches a key
/// that was never written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Precondition {
    pub key: String,
    pub expected: Vec<u8>,
}

impl Precondition {
    pub fn new(key: impl Into<String>, expected: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            expected: expected.into(),
        }
    }
}

/// Abstraction over the contract's generic key/value storage.
///
/// This trait enables testing of store-dependent code without requiring
/// a deployed contract or a wallet signer.
#[async_trait]
pub trait KvStore: Send + Sync + Clone + 'static {
    /// Whether the backing contract currently accepts calls.
    async fn is_available(&self) -> Result<bool>;

    /// Read the value stored under `key`.
    ///
    /// Returns an empty vector if nothing is stored.
    async fn get_data(&self, key: &str) -> Result<Vec<u8>>;

    /// Write several values as one transaction, provided `condition` still
    /// holds when the transaction is applied.
    ///
    /// Either every entry is applied or none is. Returns `Ok(None)` without
    /// writing anything when the condition key holds a different value.
    async fn set_many_if(
        &self,
        condition: Precondition,
        entries: Vec<(String, Vec<u8>)>,
    ) -> Result<Option<TxReceipt>>;
}
