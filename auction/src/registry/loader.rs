use tracing::{debug, info, warn};

use crate::config::{bid_payload_key, BID_INDEX_KEY};
use crate::error::{AuctionError, AuctionResult};
use crate::marketplace::{Bid, BidKeyIndex, BidPayload};
use crate::traits::KvStore;

/// Reads the bid index and per-bid payloads out of the contract store.
/// Generic over the store implementation for testability.
#[derive(Clone)]
pub struct BidRegistry<S: KvStore> {
    store: S,
}

impl<S: KvStore> BidRegistry<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Load every indexed bid, most recent first.
    ///
    /// Missing or malformed payloads are skipped. Fails only when the store
    /// is unavailable or the index itself cannot be read; callers keep their
    /// previous collection in that case.
    pub async fn load_bids(&self) -> AuctionResult<Vec<Bid>> {
        let available = self
            .store
            .is_available()
            .await
            .map_err(AuctionError::from_store)?;
        if !available {
            warn!("Auction store is not available, keeping current bids");
            return Err(AuctionError::StoreUnavailable);
        }

        let index = self.fetch_index_lenient().await?;
        let ids = index.unique_ids();

        let mut bids = Vec::with_capacity(ids.len());
        for id in &ids {
            match self.fetch_bid(id).await {
                Ok(Some(bid)) => bids.push(bid),
                Ok(None) => warn!("Bid payload missing for indexed id {}", id),
                Err(e) => warn!("Skipping bid {}: {}", id, e),
            }
        }

        // Stable: equal timestamps keep index order
        bids.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        info!("Loaded {} bids from {} indexed ids", bids.len(), ids.len());
        Ok(bids)
    }

    /// Read the bid index, failing on malformed content.
    pub async fn fetch_index(&self) -> AuctionResult<BidKeyIndex> {
        self.fetch_index_raw().await.map(|(index, _)| index)
    }

    /// Read the bid index together with the exact bytes it was decoded from.
    pub async fn fetch_index_raw(&self) -> AuctionResult<(BidKeyIndex, Vec<u8>)> {
        let data = self
            .store
            .get_data(BID_INDEX_KEY)
            .await
            .map_err(AuctionError::from_store)?;
        let index = BidKeyIndex::from_json_bytes(&data)?;
        Ok((index, data))
    }

    /// Read the bid index, treating malformed content as empty.
    async fn fetch_index_lenient(&self) -> AuctionResult<BidKeyIndex> {
        match self.fetch_index().await {
            Ok(index) => Ok(index),
            Err(AuctionError::Serialization(e)) => {
                warn!("Error parsing bid keys, treating index as empty: {}", e);
                Ok(BidKeyIndex::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch one bid payload. `Ok(None)` if nothing is stored for the id.
    pub async fn fetch_bid(&self, id: &str) -> AuctionResult<Option<Bid>> {
        let key = bid_payload_key(id);
        let data = self
            .store
            .get_data(&key)
            .await
            .map_err(AuctionError::from_store)?;
        if data.is_empty() {
            return Ok(None);
        }

        let payload = BidPayload::from_json_bytes(&data)?;
        debug!("Fetched bid payload at {}", key);
        Ok(Some(Bid::from_payload(id, payload)))
    }
}
