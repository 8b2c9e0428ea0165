use crate::traits::store::StoreRejection;

/// Domain-specific error types for the auction library.
#[derive(Debug, thiserror::Error)]
pub enum AuctionError {
    #[error("Store operation failed: {0}")]
    Store(String),

    #[error("Auction store is unavailable")]
    StoreUnavailable,

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("{0}")]
    Validation(String),

    #[error("Please connect wallet first")]
    WalletRequired,

    #[error("Wallet operation failed: {0}")]
    Wallet(String),

    #[error("Transaction rejected by user")]
    UserRejected,

    #[error("Cryptographic operation failed: {0}")]
    Crypto(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AuctionError {
    /// Classify an error coming back from a [`KvStore`](crate::traits::KvStore) call.
    ///
    /// Signers report cancellation either as a typed [`StoreRejection`] or as
    /// free text containing "user rejected"; both map to `UserRejected`.
    pub fn from_store(err: anyhow::Error) -> Self {
        if is_user_rejection(&err) {
            Self::UserRejected
        } else {
            Self::Store(format!("{err:#}"))
        }
    }

    /// Message shown in the notification banner when a submission fails.
    pub fn submission_message(&self) -> String {
        match self {
            Self::UserRejected => "Transaction rejected by user".to_string(),
            other => format!("Bid submission failed: {other}"),
        }
    }
}

fn is_user_rejection(err: &anyhow::Error) -> bool {
    err.downcast_ref::<StoreRejection>().is_some()
        || err
            .chain()
            .any(|cause| cause.to_string().to_lowercase().contains("user rejected"))
}

/// Convenience type alias.
pub type AuctionResult<T> = Result<T, AuctionError>;
