//! Edge cases around shared records, legacy data and timing.

use std::time::Duration;

use auction::actions;
use auction::config::{
    bid_payload_key, BID_INDEX_KEY, MAX_BIDDER_NOTE_LEN, MAX_STORE_VALUE_SIZE, STATUS_DISMISS,
};
use auction::{
    AuctionError, BidDraft, BidKeyIndex, BidSealer, BidStatus, NotificationKind, PlaceholderSealer,
};

use crate::common::DashboardHarness;

async fn settle() {
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_duplicate_index_entries_load_once() {
    let harness = DashboardHarness::connected(1).await;
    let submitted = harness.place_bid(0, "Neo Tokyo", "1").await;

    let id = &submitted.bid.id;
    harness
        .store()
        .insert_raw(BID_INDEX_KEY, format!(r#"["{id}","{id}"]"#))
        .await;

    actions::load_bids(harness.state(0)).await.unwrap();
    assert_eq!(harness.state(0).bids().len(), 1);
}

#[tokio::test]
async fn test_legacy_client_records_load() {
    let harness = DashboardHarness::connected(1).await;
    harness
        .store()
        .insert_raw(BID_INDEX_KEY, r#"["1700000000000-legacy1"]"#)
        .await;
    harness
        .store()
        .insert_raw(
            &bid_payload_key("1700000000000-legacy1"),
            r#"{"bidder":"0xabc","bidAmount":"1","encryptedBid":"FHE-eyJhbW91bnQiOiIxIiwibm90ZSI6IiIsInRpbWVzdGFtcCI6MX0=","timestamp":1700000000,"landParcel":"Neo Tokyo"}"#,
        )
        .await;

    actions::load_bids(harness.state(0)).await.unwrap();

    let bids = harness.state(0).bids();
    assert_eq!(bids.len(), 1);
    assert_eq!(bids[0].status, BidStatus::Active);
    let opened = PlaceholderSealer.open(&bids[0].encrypted_bid).unwrap();
    assert_eq!(opened.amount, "1");

    // A new bid lands after the legacy one in the index
    let submitted = harness.place_bid(0, "Genesis Plaza", "2").await;
    let ids: Vec<String> = harness.state(0).bids().into_iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![submitted.bid.id, "1700000000000-legacy1".to_string()]);
}

#[tokio::test]
async fn test_corrupt_payload_does_not_hide_other_bids() {
    let harness = DashboardHarness::connected(2).await;
    let good = harness.place_bid(0, "Neo Tokyo", "1").await;
    let bad = harness.place_bid(1, "Neo Tokyo", "2").await;

    harness
        .store()
        .insert_raw(&bid_payload_key(&bad.bid.id), "garbage")
        .await;
    harness.reload_all().await;

    let ids: Vec<String> = harness.state(1).bids().into_iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![good.bid.id]);
}

#[tokio::test]
async fn test_disconnect_keeps_collection_and_blocks_writes() {
    let harness = DashboardHarness::connected(1).await;
    harness.place_bid(0, "Neo Tokyo", "1").await;

    actions::disconnect_wallet(harness.state(0));

    assert_eq!(harness.state(0).bids().len(), 1);
    assert!(actions::check_availability(harness.state(0)).await.is_err());
    assert!(actions::determine_winner(harness.state(0)).await.is_err());
}

#[tokio::test]
async fn test_account_switch_changes_bidder() {
    let harness = DashboardHarness::connected(1).await;
    let bidder = harness.bidder(0);
    let next = auction::mocks::test_address(9);

    bidder.wallet.switch_accounts([next.clone()]);
    for _ in 0..20 {
        if bidder.state.account().as_deref() == Some(next.as_str()) {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(bidder.state.account(), Some(next.clone()));

    let submitted = harness.place_bid(0, "Neo Tokyo", "1").await;
    assert_eq!(submitted.bid.bidder, next);
}

#[tokio::test(start_paused = true)]
async fn test_submit_banner_clears_after_two_seconds() {
    let harness = DashboardHarness::connected(1).await;
    harness.place_bid(0, "Neo Tokyo", "1").await;

    let notifications = &harness.state(0).notifications;
    assert_eq!(
        notifications.current().map(|n| n.kind),
        Some(NotificationKind::Success)
    );

    tokio::time::advance(Duration::from_millis(2_100)).await;
    settle().await;
    assert!(notifications.current().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_new_banner_survives_older_timer() {
    let harness = DashboardHarness::connected(1).await;
    let state = harness.state(0);

    // Error at t=0 would clear at t=3s
    harness.bidder(0).wallet.set_refuse_connection(true);
    let _ = actions::connect_wallet(state).await;

    tokio::time::advance(Duration::from_secs(2)).await;
    settle().await;
    actions::check_availability(state).await.unwrap();

    tokio::time::advance(Duration::from_millis(1_500)).await;
    settle().await;
    assert_eq!(
        state.notifications.current().map(|n| n.message),
        Some("Auction system is available".to_string())
    );

    tokio::time::advance(STATUS_DISMISS).await;
    settle().await;
    assert!(state.notifications.current().is_none());
}

#[tokio::test]
async fn test_index_larger_than_a_payload_still_loads() {
    let harness = DashboardHarness::connected(1).await;
    let store = harness.store();

    let ids: Vec<String> = (0..1_400).map(|i| format!("1700000000000-{i:07}")).collect();
    for (i, id) in ids.iter().enumerate() {
        let payload = format!(
            r#"{{"bidder":"0xabc","bidAmount":"1","encryptedBid":"FHE-e30=","timestamp":{},"landParcel":"Neo Tokyo","status":"active"}}"#,
            1_700_000_000 + i
        );
        store.insert_raw(&bid_payload_key(id), payload).await;
    }
    let index: BidKeyIndex = ids.iter().map(String::as_str).collect();
    let raw_index = index.to_json_bytes().unwrap();
    assert!(raw_index.len() > MAX_STORE_VALUE_SIZE);
    store.insert_raw(BID_INDEX_KEY, raw_index).await;

    assert_eq!(actions::load_bids(harness.state(0)).await.unwrap(), 1_400);

    let submitted = harness.place_bid(0, "Cyber Valley", "3").await;
    assert_eq!(harness.state(0).bids().len(), 1_401);
    assert_eq!(harness.state(0).bids()[0].id, submitted.bid.id);
}

#[tokio::test]
async fn test_oversized_note_is_refused_before_writing() {
    let harness = DashboardHarness::connected(1).await;
    let draft = BidDraft::new("Neo Tokyo", "1", "n".repeat(30_000));

    let result = actions::submit_bid(harness.state(0), &draft).await;

    assert!(matches!(result, Err(AuctionError::Validation(_))));
    assert_eq!(harness.store().tx_count(), 0);
    assert!(harness.store().keys().await.is_empty());
    let shown = harness.state(0).notifications.current().unwrap();
    assert_eq!(shown.kind, NotificationKind::Error);
    assert!(shown.message.starts_with("Private note is too long"));
}

#[tokio::test]
async fn test_note_at_the_limit_round_trips() {
    let harness = DashboardHarness::connected(1).await;
    let draft = BidDraft::new("Neo Tokyo", "1", "\"".repeat(MAX_BIDDER_NOTE_LEN));

    let submitted = actions::submit_bid(harness.state(0), &draft).await.unwrap();

    let bids = harness.state(0).bids();
    assert_eq!(bids.len(), 1);
    assert_eq!(bids[0].id, submitted.bid.id);
    let opened = PlaceholderSealer.open(&bids[0].encrypted_bid).unwrap();
    assert_eq!(opened.note.len(), MAX_BIDDER_NOTE_LEN);
}
