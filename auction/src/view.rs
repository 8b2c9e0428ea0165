//! Derived figures and display rows for the dashboard.
//!
//! Everything here is a pure function of the loaded bid collection.

use std::str::FromStr;

use chrono::DateTime;
use serde::Serialize;

use crate::crypto::SealingScheme;
use crate::error::AuctionError;
use crate::marketplace::{Bid, BidStatus};

/// Status dropdown value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(BidStatus),
}

impl StatusFilter {
    pub fn matches(self, status: BidStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(status) => status.as_str(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = AuctionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// Search box plus status dropdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BidFilter {
    pub search: String,
    pub status: StatusFilter,
}

impl BidFilter {
    pub fn new(search: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            search: search.into(),
            status,
        }
    }

    /// Search term matches parcel or bidder (case-insensitive substring),
    /// and the status filter must match too.
    pub fn matches(&self, bid: &Bid) -> bool {
        if !self.status.matches(bid.status) {
            return false;
        }
        let term = self.search.to_lowercase();
        term.is_empty()
            || bid.land_parcel.to_lowercase().contains(&term)
            || bid.bidder.to_lowercase().contains(&term)
    }

    pub fn apply<'a>(&self, bids: &'a [Bid]) -> Vec<&'a Bid> {
        bids.iter().filter(|bid| self.matches(bid)).collect()
    }
}

/// Parse a stored amount. Anything that is not a finite number counts as 0.
pub fn parse_amount(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Counts per status and summed bid value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BidStats {
    pub active: usize,
    pub won: usize,
    pub lost: usize,
    pub total: usize,
    pub total_value: f64,
}

impl BidStats {
    pub fn from_bids(bids: &[Bid]) -> Self {
        let mut stats = Self::default();
        for bid in bids {
            match bid.status {
                BidStatus::Active => stats.active += 1,
                BidStatus::Won => stats.won += 1,
                BidStatus::Lost => stats.lost += 1,
            }
            stats.total_value += parse_amount(&bid.bid_amount);
        }
        stats.total = bids.len();
        stats
    }

    pub fn count(&self, status: BidStatus) -> usize {
        match status {
            BidStatus::Active => self.active,
            BidStatus::Won => self.won,
            BidStatus::Lost => self.lost,
        }
    }

    /// One bar per status, heights relative to the largest count.
    pub fn distribution(&self) -> Vec<StatusBar> {
        let max = BidStatus::ALL
            .iter()
            .map(|s| self.count(*s))
            .max()
            .unwrap_or(0)
            .max(1);
        BidStatus::ALL
            .iter()
            .map(|status| {
                let count = self.count(*status);
                StatusBar {
                    status: *status,
                    count,
                    height_pct: count as f64 / max as f64 * 100.0,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusBar {
    pub status: BidStatus,
    pub count: usize,
    pub height_pct: f64,
}

/// Table row with display-ready strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BidRow {
    pub id: String,
    pub short_id: String,
    pub land_parcel: String,
    pub bidder: String,
    pub amount: String,
    pub status: BidStatus,
    pub date: String,
    pub sealing: &'static str,
}

impl BidRow {
    pub fn from_bid(bid: &Bid) -> Self {
        Self {
            id: bid.id.clone(),
            short_id: format!("#{}", take_chars(&bid.id, 6)),
            land_parcel: bid.land_parcel.clone(),
            bidder: shorten_address(&bid.bidder),
            amount: format!("{} ETH", bid.bid_amount),
            status: bid.status,
            date: format_date(bid.timestamp),
            sealing: sealing_label(&bid.encrypted_bid),
        }
    }
}

fn take_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

/// `0x1234...abcd`: first 6 chars, then everything from char 38 on.
pub fn shorten_address(address: &str) -> String {
    let head = take_chars(address, 6);
    let tail: String = address.chars().skip(38).collect();
    format!("{head}...{tail}")
}

/// `YYYY-MM-DD` in UTC for a Unix timestamp in seconds.
pub fn format_date(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn sealing_label(sealed: &str) -> &'static str {
    match SealingScheme::detect(sealed) {
        Some(scheme) if scheme.is_private() => "sealed",
        Some(_) => "encoded",
        None => "unknown",
    }
}
