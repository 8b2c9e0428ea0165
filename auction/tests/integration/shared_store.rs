//! Several dashboards writing to one store at the same time.

use std::collections::HashSet;
use std::sync::Arc;

use auction::actions;
use auction::config::BID_INDEX_KEY;
use auction::mocks::{test_address, MockRandom, MockTime};
use auction::{AppState, BidDraft, BidKeyIndex, FileStore, LocalWallet, PlaceholderSealer};

use crate::common::DashboardHarness;

#[tokio::test]
async fn test_concurrent_submits_both_stay_indexed() {
    let harness = DashboardHarness::connected(2).await;
    harness.store().set_yield_after_read(true);

    let draft_a = BidDraft::new("Neo Tokyo", "1.0", "");
    let draft_b = BidDraft::new("Cyber Valley", "2.0", "");
    let (a, b) = tokio::join!(
        actions::submit_bid(harness.state(0), &draft_a),
        actions::submit_bid(harness.state(1), &draft_b),
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_ne!(a.bid.id, b.bid.id);
    assert!(harness.store().conflict_count() >= 1);

    harness.reload_all().await;
    for i in 0..harness.num_bidders() {
        let ids: HashSet<String> = harness.state(i).bids().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, HashSet::from([a.bid.id.clone(), b.bid.id.clone()]));
    }
}

#[tokio::test]
async fn test_many_concurrent_submits_lose_nothing() {
    let harness = DashboardHarness::connected(4).await;
    harness.store().set_yield_after_read(true);
    let draft = BidDraft::new("Genesis Plaza", "0.5", "");
    let submit = |i: usize| actions::submit_bid(harness.state(i), &draft);

    let (r0, r1, r2, r3) = tokio::join!(submit(0), submit(1), submit(2), submit(3));

    let submitted: HashSet<String> = [r0, r1, r2, r3]
        .into_iter()
        .map(|r| r.unwrap().bid.id)
        .collect();
    assert_eq!(submitted.len(), 4);

    let raw = harness.store().raw(BID_INDEX_KEY).await.unwrap();
    let index = BidKeyIndex::from_json_bytes(&raw).unwrap();
    assert_eq!(index.len(), 4);
    assert!(submitted.iter().all(|id| index.contains(id)));
}

fn file_state(path: &std::path::Path, seed: u64) -> AppState<FileStore, LocalWallet> {
    AppState::new(
        FileStore::new(path),
        LocalWallet::from_account(Some(test_address(seed as u8))),
        Arc::new(PlaceholderSealer),
        Arc::new(MockTime::default_time()),
        Arc::new(MockRandom::new(seed)),
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_separate_file_store_handles_do_not_overwrite_each_other() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("auction-store.json");

    // Two handles on one file, as the GUI and the headless driver would have
    let gui = file_state(&path, 1);
    let headless = file_state(&path, 2);
    actions::connect_wallet(&gui).await.unwrap();
    actions::connect_wallet(&headless).await.unwrap();

    let mut tasks = Vec::new();
    for (state, parcel) in [(gui, "Neo Tokyo"), (headless, "Quantum Gardens")] {
        tasks.push(tokio::spawn(async move {
            let mut ids = Vec::new();
            for _ in 0..5 {
                let submitted = actions::submit_bid(&state, &BidDraft::new(parcel, "1", ""))
                    .await
                    .unwrap();
                ids.push(submitted.bid.id);
            }
            ids
        }));
    }

    let mut submitted = HashSet::new();
    for task in tasks {
        submitted.extend(task.await.unwrap());
    }
    assert_eq!(submitted.len(), 10);

    let reader = file_state(&path, 3);
    assert_eq!(actions::load_bids(&reader).await.unwrap(), 10);
    let loaded: HashSet<String> = reader.bids().into_iter().map(|b| b.id).collect();
    assert_eq!(loaded, submitted);
}
