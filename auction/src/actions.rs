//! Dashboard flows shared by the GUI binary and the headless binary.
//!
//! Each flow updates `AppState` and its notification slot the same way no
//! matter which front end triggered it, and also returns its outcome so
//! callers that are not watching the banner can report it.

use tracing::{info, warn};

use crate::config::{STATUS_DISMISS, SUBMIT_SUCCESS_DISMISS};
use crate::error::{AuctionError, AuctionResult};
use crate::registry::{BidDraft, SubmittedBid};
use crate::shared_state::AppState;
use crate::traits::{KvStore, WalletProvider};

pub const SEALING_MESSAGE: &str = "Sealing bid...";
pub const SUBMITTED_MESSAGE: &str = "Sealed bid submitted successfully!";
pub const REFRESHING_STATUSES_MESSAGE: &str = "Refreshing bid statuses from the auction contract...";
pub const STATUSES_REFRESHED_MESSAGE: &str = "Bid statuses refreshed from the auction contract";

/// Reload the collection from the store.
///
/// On failure the previously loaded bids stay in place. Returns the number
/// of bids now held.
pub async fn load_bids<S: KvStore, W: WalletProvider>(
    state: &AppState<S, W>,
) -> AuctionResult<usize> {
    let _refreshing = state.refreshing_flag();
    match state.registry().load_bids().await {
        Ok(bids) => {
            let count = bids.len();
            state.replace_bids(bids);
            Ok(count)
        }
        Err(e) => {
            warn!("Keeping previous bids, reload failed: {}", e);
            Err(e)
        }
    }
}

/// Connect the wallet. Failures are shown as an error notification.
pub async fn connect_wallet<S: KvStore, W: WalletProvider>(
    state: &AppState<S, W>,
) -> AuctionResult<Option<String>> {
    state.wallet.connect().await.inspect_err(|_| {
        state.notifications.error("Failed to connect wallet");
    })
}

/// Forget the wallet account. The loaded bids are left alone.
pub fn disconnect_wallet<S: KvStore, W: WalletProvider>(state: &AppState<S, W>) {
    state.wallet.disconnect();
}

/// Seal and submit a bid from the form, then reload the collection.
///
/// Precondition and validation failures are reported before anything is
/// written. Only one submission runs at a time.
pub async fn submit_bid<S: KvStore, W: WalletProvider>(
    state: &AppState<S, W>,
    draft: &BidDraft,
) -> AuctionResult<SubmittedBid> {
    let submission = state.submission();
    let account = state.account();

    let prepared = match submission.prepare(account.as_deref(), draft) {
        Ok(prepared) => prepared,
        Err(e) => {
            state.notifications.error(e.to_string());
            return Err(e);
        }
    };

    let Some(_submitting) = state.try_begin_submit() else {
        return Err(AuctionError::Validation(
            "A bid submission is already in progress".to_string(),
        ));
    };

    state.notifications.pending(SEALING_MESSAGE);

    match submission.submit_prepared(prepared).await {
        Ok(submitted) => {
            state
                .notifications
                .success(SUBMITTED_MESSAGE, SUBMIT_SUCCESS_DISMISS);
            if let Err(e) = load_bids(state).await {
                warn!("Bid {} stored but reload failed: {}", submitted.bid.id, e);
            }
            Ok(submitted)
        }
        Err(e) => {
            warn!("Bid submission failed: {}", e);
            state.notifications.error(e.submission_message());
            Err(e)
        }
    }
}

/// Ask the store whether the auction system is reachable.
pub async fn check_availability<S: KvStore, W: WalletProvider>(
    state: &AppState<S, W>,
) -> AuctionResult<bool> {
    if !state.wallet.is_connected() {
        state.notifications.error(AuctionError::WalletRequired.to_string());
        return Err(AuctionError::WalletRequired);
    }

    match state.store.is_available().await {
        Ok(available) => {
            let word = if available { "available" } else { "unavailable" };
            state
                .notifications
                .success(format!("Auction system is {word}"), STATUS_DISMISS);
            Ok(available)
        }
        Err(e) => {
            let err = AuctionError::from_store(e);
            state
                .notifications
                .error(format!("Availability check failed: {err}"));
            Err(err)
        }
    }
}

/// Pick up winner/loser statuses recorded by the auction contract.
///
/// Statuses are decided outside this application; this only reloads so
/// they become visible.
pub async fn determine_winner<S: KvStore, W: WalletProvider>(
    state: &AppState<S, W>,
) -> AuctionResult<usize> {
    if !state.wallet.is_connected() {
        state.notifications.error(AuctionError::WalletRequired.to_string());
        return Err(AuctionError::WalletRequired);
    }

    state.notifications.pending(REFRESHING_STATUSES_MESSAGE);
    match load_bids(state).await {
        Ok(count) => {
            let stats = state.stats();
            info!(
                "Statuses refreshed: {} active, {} won, {} lost",
                stats.active, stats.won, stats.lost
            );
            state
                .notifications
                .success(STATUSES_REFRESHED_MESSAGE, STATUS_DISMISS);
            Ok(count)
        }
        Err(e) => {
            state
                .notifications
                .error(format!("Status refresh failed: {e}"));
            Err(e)
        }
    }
}
