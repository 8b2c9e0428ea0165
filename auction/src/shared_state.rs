//! Shared application state for both the GUI and headless binaries.
//!
//! `AppState` bundles everything the dashboard flows touch. The GUI binary
//! hands it to Dioxus via a `OnceLock`; the headless binary constructs one
//! directly; tests build one over mocks.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use crate::config::AuctionConfig;
use crate::crypto::BidSealer;
use crate::marketplace::Bid;
use crate::notification::NotificationCenter;
use crate::registry::{BidRegistry, BidSubmission};
use crate::traits::{KvStore, RandomSource, SystemTimeProvider, ThreadRng, TimeProvider, WalletProvider};
use crate::view::{BidFilter, BidRow, BidStats};
use crate::wallet::WalletSession;

/// Bundled application state. Clones share everything.
pub struct AppState<S: KvStore, W: WalletProvider> {
    pub store: S,
    pub sealer: Arc<dyn BidSealer>,
    pub time: Arc<dyn TimeProvider>,
    pub rng: Arc<dyn RandomSource>,
    pub wallet: WalletSession<W>,
    pub notifications: NotificationCenter,
    bids: Arc<RwLock<Vec<Bid>>>,
    filter: Arc<RwLock<BidFilter>>,
    /// Number of reloads in flight.
    refreshing: Arc<AtomicUsize>,
    submitting: Arc<AtomicUsize>,
}

impl<S: KvStore, W: WalletProvider> Clone for AppState<S, W> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            sealer: self.sealer.clone(),
            time: self.time.clone(),
            rng: self.rng.clone(),
            wallet: self.wallet.clone(),
            notifications: self.notifications.clone(),
            bids: self.bids.clone(),
            filter: self.filter.clone(),
            refreshing: self.refreshing.clone(),
            submitting: self.submitting.clone(),
        }
    }
}

impl<S: KvStore, W: WalletProvider> AppState<S, W> {
    pub fn new(
        store: S,
        wallet: W,
        sealer: Arc<dyn BidSealer>,
        time: Arc<dyn TimeProvider>,
        rng: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            store,
            sealer,
            time,
            rng,
            wallet: WalletSession::new(wallet),
            notifications: NotificationCenter::new(),
            bids: Arc::new(RwLock::new(Vec::new())),
            filter: Arc::new(RwLock::new(BidFilter::default())),
            refreshing: Arc::new(AtomicUsize::new(0)),
            submitting: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// State wired with the system clock, thread RNG and the configured sealer.
    pub fn from_config(config: &AuctionConfig, store: S, wallet: W) -> Self {
        let sealer = config.build_sealer();
        if !sealer.scheme().is_private() {
            warn!("Sealing scheme {:?} does not hide bid amounts or notes", sealer.scheme());
        }
        Self::new(
            store,
            wallet,
            sealer,
            Arc::new(SystemTimeProvider),
            Arc::new(ThreadRng),
        )
    }

    pub fn registry(&self) -> BidRegistry<S> {
        BidRegistry::new(self.store.clone())
    }

    pub fn submission(&self) -> BidSubmission<S> {
        BidSubmission::new(
            self.store.clone(),
            self.sealer.clone(),
            self.time.clone(),
            self.rng.clone(),
        )
    }

    pub fn account(&self) -> Option<String> {
        self.wallet.account()
    }

    /// Snapshot of the loaded collection, most recent first.
    pub fn bids(&self) -> Vec<Bid> {
        self.bids.read().clone()
    }

    pub fn replace_bids(&self, bids: Vec<Bid>) {
        *self.bids.write() = bids;
    }

    pub fn filter(&self) -> BidFilter {
        self.filter.read().clone()
    }

    pub fn set_filter(&self, filter: BidFilter) {
        *self.filter.write() = filter;
    }

    /// Bids passing the current filter.
    pub fn filtered_bids(&self) -> Vec<Bid> {
        let filter = self.filter.read();
        self.bids
            .read()
            .iter()
            .filter(|bid| filter.matches(bid))
            .cloned()
            .collect()
    }

    pub fn rows(&self) -> Vec<BidRow> {
        self.filtered_bids().iter().map(BidRow::from_bid).collect()
    }

    /// Stats over the whole collection, unaffected by the filter.
    pub fn stats(&self) -> BidStats {
        BidStats::from_bids(&self.bids.read())
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::SeqCst) > 0
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst) > 0
    }

    pub(crate) fn refreshing_flag(&self) -> BusyGuard {
        BusyGuard::set(self.refreshing.clone())
    }

    /// `None` if a submission is already running.
    pub(crate) fn try_begin_submit(&self) -> Option<BusyGuard> {
        BusyGuard::try_set(self.submitting.clone())
    }
}

/// Holds one slot of a busy counter until dropped.
pub(crate) struct BusyGuard {
    count: Arc<AtomicUsize>,
}

impl BusyGuard {
    fn set(count: Arc<AtomicUsize>) -> Self {
        count.fetch_add(1, Ordering::SeqCst);
        Self { count }
    }

    fn try_set(count: Arc<AtomicUsize>) -> Option<Self> {
        count
            .compare_exchange(0, 1, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self { count })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.count.fetch_sub(1, Ordering::SeqCst);
    }
}
