use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::error::{AuctionError, AuctionResult};
use crate::traits::WalletProvider;

/// Active wallet account, kept in sync with the provider's account changes.
///
/// Clones share the same session.
pub struct WalletSession<W: WalletProvider> {
    provider: W,
    account: Arc<RwLock<Option<String>>>,
    watcher: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl<W: WalletProvider> Clone for WalletSession<W> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            account: self.account.clone(),
            watcher: self.watcher.clone(),
        }
    }
}

fn active_account(accounts: &[String]) -> Option<String> {
    accounts.first().filter(|a| !a.is_empty()).cloned()
}

impl<W: WalletProvider> WalletSession<W> {
    pub fn new(provider: W) -> Self {
        Self {
            provider,
            account: Arc::new(RwLock::new(None)),
            watcher: Arc::new(Mutex::new(None)),
        }
    }

    pub fn account(&self) -> Option<String> {
        self.account.read().clone()
    }

    pub fn is_connected(&self) -> bool {
        self.account.read().is_some()
    }

    /// Request accounts from the provider and follow its account changes.
    ///
    /// The first account becomes active; an empty list leaves the session
    /// disconnected. Must be called from within a tokio runtime.
    pub async fn connect(&self) -> AuctionResult<Option<String>> {
        // Subscribe first so a switch during the request is not missed
        let rx = self.provider.subscribe_accounts();
        let accounts = self
            .provider
            .request_accounts()
            .await
            .map_err(|e| AuctionError::Wallet(format!("Failed to connect wallet: {e:#}")))?;

        let active = active_account(&accounts);
        *self.account.write() = active.clone();
        self.watch_account_changes(rx);

        match &active {
            Some(account) => info!("Wallet connected: {}", account),
            None => info!("Wallet returned no accounts"),
        }
        Ok(active)
    }

    /// Forget the active account and stop following the provider.
    pub fn disconnect(&self) {
        if let Some(handle) = self.watcher.lock().take() {
            handle.abort();
        }
        *self.account.write() = None;
        info!("Wallet disconnected");
    }

    fn watch_account_changes(&self, mut rx: watch::Receiver<Vec<String>>) {
        let account = self.account.clone();

        let handle = tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let next = active_account(&rx.borrow_and_update());
                info!("Wallet account changed: {:?}", next);
                *account.write() = next;
            }
        });

        if let Some(previous) = self.watcher.lock().replace(handle) {
            previous.abort();
        }
    }
}
