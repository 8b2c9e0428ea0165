//! Multi-bidder submission and loading flows.

use auction::config::BID_INDEX_KEY;
use auction::{BidFilter, BidKeyIndex, BidStatus, StatusFilter};

use crate::common::DashboardHarness;

#[tokio::test]
async fn test_all_bidders_see_every_bid_newest_first() {
    let harness = DashboardHarness::connected(3).await;

    let first = harness.place_bid(0, "Genesis Plaza", "1.0").await;
    let second = harness.place_bid(1, "Dragon's Keep", "2.5").await;
    let third = harness.place_bid(2, "Neo Tokyo", "0.75").await;

    harness.reload_all().await;

    for i in 0..harness.num_bidders() {
        let ids: Vec<String> = harness.state(i).bids().into_iter().map(|b| b.id).collect();
        assert_eq!(
            ids,
            vec![
                third.bid.id.clone(),
                second.bid.id.clone(),
                first.bid.id.clone()
            ]
        );
    }
}

#[tokio::test]
async fn test_each_submission_is_one_transaction() {
    let harness = DashboardHarness::connected(2).await;

    let a = harness.place_bid(0, "Cyber Valley", "3").await;
    let b = harness.place_bid(1, "Cyber Valley", "4").await;

    assert_eq!(harness.store().tx_count(), 2);
    assert_eq!(a.receipt.keys_written, 2);
    assert_eq!(b.receipt.keys_written, 2);

    let raw = harness.store().raw(BID_INDEX_KEY).await.unwrap();
    let index = BidKeyIndex::from_json_bytes(&raw).unwrap();
    assert_eq!(index.unique_ids(), vec![a.bid.id.as_str(), b.bid.id.as_str()]);
}

#[tokio::test]
async fn test_submitted_bid_appears_exactly_once() {
    let harness = DashboardHarness::connected(1).await;

    let submitted = harness.place_bid(0, "Quantum Gardens", "1.5").await;
    let state = harness.state(0);

    let matching = state
        .bids()
        .into_iter()
        .filter(|b| b.id == submitted.bid.id)
        .count();
    assert_eq!(matching, 1);

    let bid = &state.bids()[0];
    assert_eq!(bid.bidder, harness.bidder(0).address);
    assert_eq!(bid.status, BidStatus::Active);
    assert_eq!(bid.timestamp, 1_704_067_200);
    assert!(bid.encrypted_bid.starts_with("FHE-"));
}

#[tokio::test]
async fn test_stats_and_filter_over_shared_collection() {
    let harness = DashboardHarness::connected(2).await;

    harness.place_bid(0, "Neo Tokyo", "1.5").await;
    harness.place_bid(1, "Neo Tokyo", "2").await;
    harness.place_bid(1, "Genesis Plaza", "0.5").await;
    harness.reload_all().await;

    let state = harness.state(0);
    let stats = state.stats();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.active, 3);
    assert_eq!(stats.total_value, 4.0);

    let bidder_two = harness.bidder(1).address.to_uppercase();
    state.set_filter(BidFilter::new(
        bidder_two[2..].to_string(),
        StatusFilter::Only(BidStatus::Active),
    ));
    assert_eq!(state.filtered_bids().len(), 2);

    state.set_filter(BidFilter::new("tokyo", StatusFilter::Only(BidStatus::Won)));
    assert!(state.filtered_bids().is_empty());
}

#[tokio::test]
async fn test_rows_are_display_ready() {
    let harness = DashboardHarness::connected(1).await;
    harness.place_bid(0, "Dragon's Keep", "2.5").await;

    let rows = harness.state(0).rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, "2.5 ETH");
    assert_eq!(rows[0].date, "2024-01-01");
    assert_eq!(rows[0].short_id, "#170406");
    assert_eq!(rows[0].bidder, "0x0101...0101");
}
