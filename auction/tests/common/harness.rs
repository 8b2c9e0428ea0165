//! Multi-bidder test harness for integration testing.
//!
//! Every bidder gets its own dashboard state and wallet, but all of them
//! read and write the same mock contract store and share one clock.

use std::sync::Arc;

use auction::actions;
use auction::mocks::{test_address, MockRandom, MockStore, MockTime, MockWallet};
use auction::{AppState, BidDraft, PlaceholderSealer, SubmittedBid};

pub type TestState = AppState<MockStore, MockWallet>;

/// One dashboard instance in the harness.
#[allow(dead_code)]
pub struct BidderContext {
    pub index: usize,
    pub address: String,
    pub state: TestState,
    pub wallet: MockWallet,
}

/// Simulates several dashboards bidding against one contract store.
pub struct DashboardHarness {
    bidders: Vec<BidderContext>,
    store: MockStore,
    time: MockTime,
}

#[allow(dead_code)]
impl DashboardHarness {
    /// Create a harness with the given number of bidders, none connected yet.
    pub fn new(num_bidders: usize) -> Self {
        let store = MockStore::new();
        let time = MockTime::default_time();

        let bidders = (0..num_bidders)
            .map(|i| {
                let address = test_address(i as u8 + 1);
                let wallet = MockWallet::new([address.clone()]);
                let state = AppState::new(
                    store.clone(),
                    wallet.clone(),
                    Arc::new(PlaceholderSealer),
                    Arc::new(time.clone()),
                    Arc::new(MockRandom::new(0x5EED + i as u64)),
                );
                BidderContext {
                    index: i,
                    address,
                    state,
                    wallet,
                }
            })
            .collect();

        Self {
            bidders,
            store,
            time,
        }
    }

    /// Create a harness and connect every bidder's wallet.
    pub async fn connected(num_bidders: usize) -> Self {
        let harness = Self::new(num_bidders);
        for bidder in &harness.bidders {
            actions::connect_wallet(&bidder.state)
                .await
                .expect("mock wallet should connect");
        }
        harness
    }

    pub fn bidder(&self, index: usize) -> &BidderContext {
        &self.bidders[index]
    }

    pub fn state(&self, index: usize) -> &TestState {
        &self.bidders[index].state
    }

    pub fn num_bidders(&self) -> usize {
        self.bidders.len()
    }

    pub fn store(&self) -> &MockStore {
        &self.store
    }

    pub fn time(&self) -> &MockTime {
        &self.time
    }

    /// Submit a bid as `index`, then move the clock forward a second so the
    /// next bid gets a later timestamp.
    pub async fn place_bid(&self, index: usize, parcel: &str, amount: &str) -> SubmittedBid {
        let submitted = actions::submit_bid(self.state(index), &BidDraft::new(parcel, amount, ""))
            .await
            .expect("bid submission should succeed");
        self.time.advance_secs(1);
        submitted
    }

    /// Reload every bidder's collection.
    pub async fn reload_all(&self) {
        for bidder in &self.bidders {
            actions::load_bids(&bidder.state)
                .await
                .expect("reload should succeed");
        }
    }
}
