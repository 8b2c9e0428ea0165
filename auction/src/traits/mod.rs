//! Trait abstractions for dependency injection and testability.
//!
//! The contract store and the wallet are external collaborators; these traits
//! let the registry and submission flows run against mocks in tests and
//! against local development backends in the binaries.

pub mod random;
pub mod store;
pub mod time;
pub mod wallet;

pub use random::{RandomSource, ThreadRng};
pub use store::{KvStore, Precondition, StoreRejection, TxReceipt};
pub use time::{SystemTimeProvider, TimeProvider};
pub use wallet::WalletProvider;
