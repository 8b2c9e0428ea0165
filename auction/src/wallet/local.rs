use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;

use crate::traits::WalletProvider;

/// Development wallet backed by a fixed, switchable account list.
#[derive(Debug, Clone)]
pub struct LocalWallet {
    accounts: Arc<watch::Sender<Vec<String>>>,
}

impl LocalWallet {
    pub fn new(accounts: Vec<String>) -> Self {
        let (tx, _rx) = watch::channel(accounts);
        Self {
            accounts: Arc::new(tx),
        }
    }

    /// Wallet exposing the configured account, if any.
    pub fn from_account(account: Option<String>) -> Self {
        Self::new(account.into_iter().collect())
    }

    /// Make `account` the active account, as a wallet extension would on a
    /// user switch.
    pub fn switch_account(&self, account: impl Into<String>) {
        let account = account.into();
        self.accounts.send_modify(|accounts| {
            accounts.retain(|a| a != &account);
            accounts.insert(0, account);
        });
    }
}

#[async_trait]
impl WalletProvider for LocalWallet {
    async fn request_accounts(&self) -> Result<Vec<String>> {
        Ok(self.accounts.borrow().clone())
    }

    fn subscribe_accounts(&self) -> watch::Receiver<Vec<String>> {
        self.accounts.subscribe()
    }
}
