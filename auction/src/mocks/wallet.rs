//! Mock wallet provider for testing.

use crate::traits::WalletProvider;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug)]
struct MockWalletInner {
    accounts: watch::Sender<Vec<String>>,
    refuse_connection: AtomicBool,
    request_count: AtomicU64,
}

/// Wallet whose accounts are driven by the test.
#[derive(Debug, Clone)]
pub struct MockWallet {
    inner: Arc<MockWalletInner>,
}

impl MockWallet {
    /// Create a wallet exposing the given accounts.
    pub fn new<I, S>(accounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (tx, _rx) = watch::channel(accounts.into_iter().map(Into::into).collect());
        Self {
            inner: Arc::new(MockWalletInner {
                accounts: tx,
                refuse_connection: AtomicBool::new(false),
                request_count: AtomicU64::new(0),
            }),
        }
    }

    /// Wallet with one well-formed test address.
    pub fn with_test_account() -> Self {
        Self::new([test_address(1)])
    }

    /// Simulate the user switching accounts (or locking the wallet with `[]`).
    pub fn switch_accounts<I, S>(&self, accounts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner
            .accounts
            .send_replace(accounts.into_iter().map(Into::into).collect());
    }

    /// Make `request_accounts` fail as if the user declined.
    pub fn set_refuse_connection(&self, refuse: bool) {
        self.inner.refuse_connection.store(refuse, Ordering::SeqCst);
    }

    /// Number of `request_accounts` calls seen.
    pub fn request_count(&self) -> u64 {
        self.inner.request_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn request_accounts(&self) -> Result<Vec<String>> {
        self.inner.request_count.fetch_add(1, Ordering::SeqCst);
        if self.inner.refuse_connection.load(Ordering::SeqCst) {
            return Err(anyhow!("MockWallet: user rejected the request"));
        }
        Ok(self.inner.accounts.borrow().clone())
    }

    fn subscribe_accounts(&self) -> watch::Receiver<Vec<String>> {
        self.inner.accounts.subscribe()
    }
}

/// Deterministic 42-character address for tests.
pub fn test_address(id: u8) -> String {
    format!("0x{}", hex::encode([id; 20]))
}
