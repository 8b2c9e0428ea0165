//! Wallet provider abstraction for account discovery.

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::watch;

/// Abstraction over a wallet that exposes signer accounts.
#[async_trait]
pub trait WalletProvider: Send + Sync + Clone + 'static {
    /// Ask the wallet for its accounts. The first entry is the active one.
    ///
    /// May fail if the user declines the connection request.
    async fn request_accounts(&self) -> Result<Vec<String>>;

    /// Subscribe to account-change notifications.
    ///
    /// The receiver yields the full account list each time it changes;
    /// an empty list means the wallet disconnected.
    fn subscribe_accounts(&self) -> watch::Receiver<Vec<String>>;
}
