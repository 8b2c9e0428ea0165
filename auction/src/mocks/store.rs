//! Mock contract store for testing.

use crate::traits::{KvStore, Precondition, StoreRejection, TxReceipt};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Types of failures that can be simulated.
#[derive(Debug, Clone)]
pub enum MockStoreFailure {
    /// Fail all operations.
    All,
    /// Fail only read operations.
    Reads,
    /// Fail only write operations.
    Writes,
    /// Fail reads and writes touching a specific key.
    OnKey(String),
    /// Writes fail as if the user declined to sign.
    Reject,
}

#[derive(Debug)]
struct MockStoreInner {
    /// Stored values keyed by store key.
    data: RwLock<HashMap<String, Vec<u8>>>,
    /// Whether `is_available` reports true.
    available: AtomicBool,
    /// Number of accepted write transactions.
    tx_count: AtomicU64,
    /// Number of conditional writes refused because the condition failed.
    conflicts: AtomicU64,
    /// Yield to the scheduler after every read, so concurrent writers interleave.
    yield_after_read: AtomicBool,
    /// Whether to simulate failures.
    fail_mode: RwLock<Option<MockStoreFailure>>,
}

/// In-memory contract store.
///
/// Clones share the same storage, so a test can hand one clone to the code
/// under test and inspect another.
#[derive(Debug, Clone)]
pub struct MockStore {
    inner: Arc<MockStoreInner>,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MockStoreInner {
                data: RwLock::new(HashMap::new()),
                available: AtomicBool::new(true),
                tx_count: AtomicU64::new(0),
                conflicts: AtomicU64::new(0),
                yield_after_read: AtomicBool::new(false),
                fail_mode: RwLock::new(None),
            }),
        }
    }

    /// Set failure mode for testing error handling.
    pub async fn set_fail_mode(&self, mode: Option<MockStoreFailure>) {
        *self.inner.fail_mode.write().await = mode;
    }

    /// Control what `is_available` reports.
    pub fn set_available(&self, available: bool) {
        self.inner.available.store(available, Ordering::SeqCst);
    }

    /// Make every read yield once before returning.
    pub fn set_yield_after_read(&self, enabled: bool) {
        self.inner.yield_after_read.store(enabled, Ordering::SeqCst);
    }

    /// Store raw bytes directly, bypassing failure simulation and tx counting.
    pub async fn insert_raw(&self, key: &str, value: impl Into<Vec<u8>>) {
        self.inner
            .data
            .write()
            .await
            .insert(key.to_string(), value.into());
    }

    /// Read raw bytes directly.
    pub async fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.inner.data.read().await.get(key).cloned()
    }

    pub async fn has_key(&self, key: &str) -> bool {
        self.inner.data.read().await.contains_key(key)
    }

    /// All stored keys, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.inner.data.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of write transactions accepted so far.
    pub fn tx_count(&self) -> u64 {
        self.inner.tx_count.load(Ordering::SeqCst)
    }

    /// Number of conditional writes refused so far.
    pub fn conflict_count(&self) -> u64 {
        self.inner.conflicts.load(Ordering::SeqCst)
    }

    async fn check_read(&self, key: &str) -> Result<()> {
        match &*self.inner.fail_mode.read().await {
            Some(MockStoreFailure::All | MockStoreFailure::Reads) => {
                Err(anyhow!("MockStore: simulated read failure"))
            }
            Some(MockStoreFailure::OnKey(k)) if k == key => {
                Err(anyhow!("MockStore: simulated read failure on {key}"))
            }
            _ => Ok(()),
        }
    }

    async fn check_write(&self, keys: &[&str]) -> Result<()> {
        match &*self.inner.fail_mode.read().await {
            Some(MockStoreFailure::All | MockStoreFailure::Writes) => {
                Err(anyhow!("MockStore: simulated write failure"))
            }
            Some(MockStoreFailure::Reject) => Err(StoreRejection.into()),
            Some(MockStoreFailure::OnKey(k)) if keys.contains(&k.as_str()) => {
                Err(anyhow!("MockStore: simulated write failure on {k}"))
            }
            _ => Ok(()),
        }
    }

    fn next_receipt(&self, keys_written: usize) -> TxReceipt {
        let n = self.inner.tx_count.fetch_add(1, Ordering::SeqCst) + 1;
        TxReceipt {
            tx_id: format!("0xmock{n:08x}"),
            keys_written,
        }
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvStore for MockStore {
    async fn is_available(&self) -> Result<bool> {
        if matches!(*self.inner.fail_mode.read().await, Some(MockStoreFailure::All)) {
            return Err(anyhow!("MockStore: simulated availability failure"));
        }
        Ok(self.inner.available.load(Ordering::SeqCst))
    }

    async fn get_data(&self, key: &str) -> Result<Vec<u8>> {
        self.check_read(key).await?;
        let value = self
            .inner
            .data
            .read()
            .await
            .get(key)
            .cloned()
            .unwrap_or_default();
        if self.inner.yield_after_read.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
        Ok(value)
    }

    async fn set_many_if(
        &self,
        condition: Precondition,
        entries: Vec<(String, Vec<u8>)>,
    ) -> Result<Option<TxReceipt>> {
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        self.check_write(&keys).await?;

        let count = entries.len();
        let mut data = self.inner.data.write().await;
        let current = data.get(&condition.key).map(Vec::as_slice).unwrap_or_default();
        if current != condition.expected.as_slice() {
            self.inner.conflicts.fetch_add(1, Ordering::SeqCst);
            return Ok(None);
        }
        for (key, value) in entries {
            data.insert(key, value);
        }
        Ok(Some(self.next_receipt(count)))
    }
}
