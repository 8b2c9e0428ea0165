pub mod actions;
pub mod config;
pub mod crypto;
pub mod error;
pub mod marketplace;
pub mod notification;
pub mod registry;
pub mod shared_state;
pub mod store;
pub mod traits;
pub mod util;
pub mod view;
pub mod wallet;

#[cfg(any(test, feature = "test-support"))]
pub mod mocks;

pub use config::{AuctionConfig, SealerKind};
pub use crypto::{AesGcmSealer, BidSealer, PlaceholderSealer, SealedBidPayload, SealingScheme};
pub use error::{AuctionError, AuctionResult};
pub use marketplace::{Bid, BidKeyIndex, BidPayload, BidStatus, LandParcel};
pub use notification::{Notification, NotificationCenter, NotificationKind};
pub use registry::{BidDraft, BidRegistry, BidSubmission, SubmittedBid};
pub use shared_state::AppState;
pub use store::FileStore;
pub use traits::{
    KvStore, Precondition, RandomSource, StoreRejection, TimeProvider, TxReceipt, WalletProvider,
};
pub use view::{BidFilter, BidRow, BidStats, StatusBar, StatusFilter};
pub use wallet::{LocalWallet, WalletSession};
