//! Wallet connection state and the local development wallet.

pub mod local;
pub mod session;

pub use local::LocalWallet;
pub use session::WalletSession;
