//! Dashboard flows over the on-disk development store.

use std::sync::Arc;

use auction::actions;
use auction::mocks::{test_address, MockRandom, MockTime};
use auction::{AesGcmSealer, AppState, BidDraft, BidSealer, FileStore, LocalWallet};

fn state_at(path: &std::path::Path, key: [u8; 32]) -> AppState<FileStore, LocalWallet> {
    AppState::new(
        FileStore::new(path),
        LocalWallet::from_account(Some(test_address(7))),
        Arc::new(AesGcmSealer::new(key)),
        Arc::new(MockTime::default_time()),
        Arc::new(MockRandom::default()),
    )
}

#[tokio::test]
async fn test_bids_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("auction-store.json");
    let key = [3u8; 32];

    let first_run = state_at(&path, key);
    actions::connect_wallet(&first_run).await.unwrap();
    let submitted = actions::submit_bid(
        &first_run,
        &BidDraft::new("Quantum Gardens", "4.2", "north corner"),
    )
    .await
    .unwrap();

    let second_run = state_at(&path, key);
    let count = actions::load_bids(&second_run).await.unwrap();
    assert_eq!(count, 1);

    let bid = &second_run.bids()[0];
    assert_eq!(bid.id, submitted.bid.id);
    assert_eq!(bid.land_parcel, "Quantum Gardens");

    let opened = AesGcmSealer::new(key).open(&bid.encrypted_bid).unwrap();
    assert_eq!(opened.amount, "4.2");
    assert_eq!(opened.note, "north corner");
    assert!(!std::fs::read_to_string(&path).unwrap().contains("north corner"));
}

#[tokio::test]
async fn test_empty_store_file_loads_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_at(&dir.path().join("auction-store.json"), [1u8; 32]);

    assert_eq!(actions::load_bids(&state).await.unwrap(), 0);
    assert!(state.bids().is_empty());
}
