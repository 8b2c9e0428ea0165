//! Mock implementations for testing.
//!
//! These stand in for the contract store, the wallet, the clock and the RNG
//! so registry and dashboard flows can be exercised deterministically.

pub mod random;
pub mod store;
pub mod time;
pub mod wallet;

pub use random::MockRandom;
pub use store::{MockStore, MockStoreFailure};
pub use time::MockTime;
pub use wallet::{test_address, MockWallet};
