//! Failure paths: nothing half-written, nothing lost.

use auction::actions;
use auction::config::{bid_payload_key, BID_INDEX_KEY};
use auction::mocks::MockStoreFailure;
use auction::{AuctionError, BidDraft, NotificationKind};

use crate::common::DashboardHarness;

#[tokio::test]
async fn test_disconnected_bidder_cannot_write() {
    let harness = DashboardHarness::new(1);

    let result = actions::submit_bid(harness.state(0), &BidDraft::new("Neo Tokyo", "1", "")).await;

    assert!(matches!(result, Err(AuctionError::WalletRequired)));
    assert!(harness.store().keys().await.is_empty());
}

#[tokio::test]
async fn test_validation_failures_write_nothing() {
    let harness = DashboardHarness::connected(1).await;
    let state = harness.state(0);

    for draft in [
        BidDraft::new("", "1", ""),
        BidDraft::new("Neo Tokyo", "   ", ""),
        BidDraft::new("Atlantis", "1", ""),
        BidDraft::new("Neo Tokyo", "-2", ""),
        BidDraft::new("Neo Tokyo", "lots", ""),
    ] {
        let result = actions::submit_bid(state, &draft).await;
        assert!(matches!(result, Err(AuctionError::Validation(_))), "{draft:?}");
    }

    assert_eq!(harness.store().tx_count(), 0);
    assert!(harness.store().keys().await.is_empty());
}

#[tokio::test]
async fn test_failed_write_leaves_store_unchanged() {
    let harness = DashboardHarness::connected(2).await;
    let existing = harness.place_bid(0, "Genesis Plaza", "1").await;
    let index_before = harness.store().raw(BID_INDEX_KEY).await;
    let keys_before = harness.store().keys().await;

    harness
        .store()
        .set_fail_mode(Some(MockStoreFailure::Writes))
        .await;
    let result =
        actions::submit_bid(harness.state(1), &BidDraft::new("Neo Tokyo", "2", "")).await;

    assert!(matches!(result, Err(AuctionError::Store(_))));
    assert_eq!(harness.store().raw(BID_INDEX_KEY).await, index_before);
    assert_eq!(harness.store().keys().await, keys_before);
    assert!(harness
        .store()
        .has_key(&bid_payload_key(&existing.bid.id))
        .await);

    let shown = harness.state(1).notifications.current().unwrap();
    assert_eq!(shown.kind, NotificationKind::Error);
    assert!(shown.message.starts_with("Bid submission failed: "));
}

#[tokio::test]
async fn test_user_rejection_is_reported_plainly() {
    let harness = DashboardHarness::connected(1).await;
    harness
        .store()
        .set_fail_mode(Some(MockStoreFailure::Reject))
        .await;

    let result =
        actions::submit_bid(harness.state(0), &BidDraft::new("Neo Tokyo", "2", "")).await;

    assert!(matches!(result, Err(AuctionError::UserRejected)));
    assert_eq!(
        harness
            .state(0)
            .notifications
            .current()
            .map(|n| n.message),
        Some("Transaction rejected by user".to_string())
    );
}

#[tokio::test]
async fn test_unavailable_store_keeps_loaded_bids() {
    let harness = DashboardHarness::connected(1).await;
    harness.place_bid(0, "Neo Tokyo", "1").await;
    harness.place_bid(0, "Neo Tokyo", "2").await;

    harness.store().set_available(false);
    let result = actions::load_bids(harness.state(0)).await;

    assert!(matches!(result, Err(AuctionError::StoreUnavailable)));
    assert_eq!(harness.state(0).bids().len(), 2);
}

#[tokio::test]
async fn test_malformed_index_blocks_submission() {
    let harness = DashboardHarness::connected(1).await;
    harness.store().insert_raw(BID_INDEX_KEY, "{not an array").await;

    let result =
        actions::submit_bid(harness.state(0), &BidDraft::new("Neo Tokyo", "1", "")).await;

    assert!(matches!(result, Err(AuctionError::Serialization(_))));
    assert_eq!(
        harness.store().raw(BID_INDEX_KEY).await,
        Some(b"{not an array".to_vec())
    );
    assert_eq!(harness.store().tx_count(), 0);
}

#[tokio::test]
async fn test_refused_wallet_connection() {
    let harness = DashboardHarness::new(1);
    harness.bidder(0).wallet.set_refuse_connection(true);

    let result = actions::connect_wallet(harness.state(0)).await;

    assert!(matches!(result, Err(AuctionError::Wallet(_))));
    assert!(harness.state(0).account().is_none());
    assert_eq!(
        harness
            .state(0)
            .notifications
            .current()
            .map(|n| n.message),
        Some("Failed to connect wallet".to_string())
    );
}
