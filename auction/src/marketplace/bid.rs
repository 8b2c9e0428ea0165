use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::MAX_STORE_VALUE_SIZE;
use crate::error::{AuctionError, AuctionResult};

/// Lifecycle state of a bid.
///
/// Bids are created `Active`; nothing in this crate moves them to `Won` or
/// `Lost`. Those values only appear if the contract side writes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BidStatus {
    #[default]
    Active,
    Won,
    Lost,
}

impl BidStatus {
    pub const ALL: [Self; 3] = [Self::Active, Self::Won, Self::Lost];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }

    /// Capitalized label used in charts.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Won => "Won",
            Self::Lost => "Lost",
        }
    }
}

impl fmt::Display for BidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BidStatus {
    type Err = AuctionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "won" => Ok(Self::Won),
            "lost" => Ok(Self::Lost),
            other => Err(AuctionError::Validation(format!("Unknown bid status '{other}'"))),
        }
    }
}

/// Missing, null or empty status reads as `Active`.
fn status_or_active<'de, D>(deserializer: D) -> Result<BidStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(BidStatus::Active),
        Some(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// The closed set of parcels open for bidding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandParcel {
    GenesisPlaza,
    DragonsKeep,
    NeoTokyo,
    CyberValley,
    QuantumGardens,
}

impl LandParcel {
    pub const ALL: [Self; 5] = [
        Self::GenesisPlaza,
        Self::DragonsKeep,
        Self::NeoTokyo,
        Self::CyberValley,
        Self::QuantumGardens,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::GenesisPlaza => "Genesis Plaza",
            Self::DragonsKeep => "Dragon's Keep",
            Self::NeoTokyo => "Neo Tokyo",
            Self::CyberValley => "Cyber Valley",
            Self::QuantumGardens => "Quantum Gardens",
        }
    }
}

impl fmt::Display for LandParcel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LandParcel {
    type Err = AuctionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|parcel| parcel.name() == s)
            .ok_or_else(|| AuctionError::Validation(format!("Unknown land parcel '{s}'")))
    }
}

/// Wire form of a bid as stored under `bid_{id}`.
///
/// The id is not part of the payload; it comes from the bid index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidPayload {
    pub bidder: String,
    pub bid_amount: String,
    pub encrypted_bid: String,
    pub timestamp: u64,
    pub land_parcel: String,
    #[serde(default, deserialize_with = "status_or_active")]
    pub status: BidStatus,
}

impl BidPayload {
    /// Serialize to UTF-8 JSON for store writes.
    pub fn to_json_bytes(&self) -> AuctionResult<Vec<u8>> {
        crate::util::json_to_vec(self)
    }

    /// Deserialize from UTF-8 JSON.
    pub fn from_json_bytes(data: &[u8]) -> AuctionResult<Self> {
        crate::util::json_from_limited_slice(data, MAX_STORE_VALUE_SIZE)
    }
}

/// A bid as held in the local collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Bid {
    pub id: String,
    pub bidder: String,
    pub bid_amount: String,
    /// Opaque sealed representation; never interpreted by the loader.
    pub encrypted_bid: String,
    pub timestamp: u64,
    pub land_parcel: String,
    pub status: BidStatus,
}

impl Bid {
    pub fn from_payload(id: impl Into<String>, payload: BidPayload) -> Self {
        Self {
            id: id.into(),
            bidder: payload.bidder,
            bid_amount: payload.bid_amount,
            encrypted_bid: payload.encrypted_bid,
            timestamp: payload.timestamp,
            land_parcel: payload.land_parcel,
            status: payload.status,
        }
    }

    pub fn to_payload(&self) -> BidPayload {
        BidPayload {
            bidder: self.bidder.clone(),
            bid_amount: self.bid_amount.clone(),
            encrypted_bid: self.encrypted_bid.clone(),
            timestamp: self.timestamp,
            land_parcel: self.land_parcel.clone(),
            status: self.status,
        }
    }
}
