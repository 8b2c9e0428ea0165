use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{
    bid_payload_key, BID_ID_SUFFIX_LEN, BID_INDEX_KEY, MAX_BIDDER_NOTE_LEN,
    MAX_INDEX_WRITE_ATTEMPTS, MAX_STORE_VALUE_SIZE,
};
use crate::crypto::{BidSealer, SealedBidPayload};
use crate::error::{AuctionError, AuctionResult};
use crate::marketplace::{Bid, BidStatus, LandParcel};
use crate::registry::loader::BidRegistry;
use crate::traits::{KvStore, Precondition, RandomSource, TimeProvider, TxReceipt};

/// Form input for a new bid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BidDraft {
    pub land_parcel: String,
    pub bid_amount: String,
    pub bidder_note: String,
}

impl BidDraft {
    pub fn new(
        land_parcel: impl Into<String>,
        bid_amount: impl Into<String>,
        bidder_note: impl Into<String>,
    ) -> Self {
        Self {
            land_parcel: land_parcel.into(),
            bid_amount: bid_amount.into(),
            bidder_note: bidder_note.into(),
        }
    }

    /// Check the required fields before anything touches the store.
    pub fn validate(&self) -> AuctionResult<ValidatedDraft> {
        let amount = self.bid_amount.trim();
        if self.land_parcel.is_empty() || amount.is_empty() {
            return Err(AuctionError::Validation(
                "Please fill required fields".to_string(),
            ));
        }

        let land_parcel: LandParcel = self.land_parcel.parse()?;

        match amount.parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => {}
            _ => {
                return Err(AuctionError::Validation(format!(
                    "Bid amount must be a positive number, got '{amount}'"
                )))
            }
        }

        if self.bidder_note.len() > MAX_BIDDER_NOTE_LEN {
            return Err(AuctionError::Validation(format!(
                "Private note is too long ({} bytes, max {MAX_BIDDER_NOTE_LEN})",
                self.bidder_note.len()
            )));
        }

        Ok(ValidatedDraft {
            land_parcel,
            bid_amount: amount.to_string(),
            bidder_note: self.bidder_note.clone(),
        })
    }
}

/// A draft that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDraft {
    pub land_parcel: LandParcel,
    pub bid_amount: String,
    pub bidder_note: String,
}

/// Outcome of a successful submission.
#[derive(Debug, Clone)]
pub struct SubmittedBid {
    pub bid: Bid,
    pub receipt: TxReceipt,
}

/// Seals a bid and writes it, together with the updated index, in a single
/// store transaction.
pub struct BidSubmission<S: KvStore> {
    store: S,
    sealer: Arc<dyn BidSealer>,
    time: Arc<dyn TimeProvider>,
    rng: Arc<dyn RandomSource>,
}

impl<S: KvStore> BidSubmission<S> {
    pub fn new(
        store: S,
        sealer: Arc<dyn BidSealer>,
        time: Arc<dyn TimeProvider>,
        rng: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            store,
            sealer,
            time,
            rng,
        }
    }

    /// Check the wallet precondition and validate the draft.
    ///
    /// Performs no store access.
    pub fn prepare(&self, account: Option<&str>, draft: &BidDraft) -> AuctionResult<PreparedBid> {
        let bidder = account
            .filter(|a| !a.is_empty())
            .ok_or(AuctionError::WalletRequired)?;
        let validated = draft.validate()?;
        Ok(PreparedBid {
            bidder: bidder.to_string(),
            draft: validated,
        })
    }

    /// Full submission: precondition, validation, sealing and the atomic write.
    pub async fn submit_bid(
        &self,
        account: Option<&str>,
        draft: &BidDraft,
    ) -> AuctionResult<SubmittedBid> {
        let prepared = self.prepare(account, draft)?;
        self.submit_prepared(prepared).await
    }

    /// Seal and persist a prepared bid.
    pub async fn submit_prepared(&self, prepared: PreparedBid) -> AuctionResult<SubmittedBid> {
        let now_millis = self.time.now_millis();
        let encrypted_bid = self.sealer.seal(&SealedBidPayload {
            amount: prepared.draft.bid_amount.clone(),
            note: prepared.draft.bidder_note.clone(),
            timestamp: now_millis,
        })?;

        let bid = Bid {
            id: self.generate_bid_id(now_millis),
            bidder: prepared.bidder,
            bid_amount: prepared.draft.bid_amount,
            encrypted_bid,
            timestamp: now_millis / 1000,
            land_parcel: prepared.draft.land_parcel.name().to_string(),
            status: BidStatus::Active,
        };

        let receipt = self.write_bid(&bid).await?;
        info!(
            "Submitted bid {} on {} (tx {})",
            bid.id, bid.land_parcel, receipt.tx_id
        );
        Ok(SubmittedBid { bid, receipt })
    }

    /// Persist the payload and the extended index as one transaction.
    ///
    /// The write only applies if the index is still the one it was built
    /// from; when another writer got there first the index is re-read and
    /// the write retried. A malformed index aborts the write instead of
    /// being replaced, so existing ids are never dropped. Re-submitting a bid
    /// whose id is already indexed rewrites its payload and leaves the index
    /// unchanged.
    pub async fn write_bid(&self, bid: &Bid) -> AuctionResult<TxReceipt> {
        let payload = bid.to_payload().to_json_bytes()?;
        if payload.len() > MAX_STORE_VALUE_SIZE {
            return Err(AuctionError::Validation(format!(
                "Sealed bid is too large to store ({} bytes, max {MAX_STORE_VALUE_SIZE})",
                payload.len()
            )));
        }

        let registry = BidRegistry::new(self.store.clone());
        for attempt in 1..=MAX_INDEX_WRITE_ATTEMPTS {
            let (mut index, raw_index) = registry.fetch_index_raw().await?;
            index.push_unique(bid.id.clone());

            let entries = vec![
                (bid_payload_key(&bid.id), payload.clone()),
                (BID_INDEX_KEY.to_string(), index.to_json_bytes()?),
            ];

            let outcome = self
                .store
                .set_many_if(Precondition::new(BID_INDEX_KEY, raw_index), entries)
                .await
                .map_err(AuctionError::from_store)?;
            if let Some(receipt) = outcome {
                return Ok(receipt);
            }
            debug!(
                "Bid index changed while writing {} (attempt {}), retrying",
                bid.id, attempt
            );
        }

        Err(AuctionError::Store(format!(
            "Bid index kept changing, gave up after {MAX_INDEX_WRITE_ATTEMPTS} attempts"
        )))
    }

    /// `{unix millis}-{base36 suffix}`.
    fn generate_bid_id(&self, now_millis: u64) -> String {
        format!("{}-{}", now_millis, self.rng.base36_suffix(BID_ID_SUFFIX_LEN))
    }
}

/// A bid that passed the wallet and form checks, ready to be sealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedBid {
    pub bidder: String,
    pub draft: ValidatedDraft,
}
