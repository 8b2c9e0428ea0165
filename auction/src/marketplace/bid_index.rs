use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::MAX_BID_INDEX_SIZE;
use crate::error::AuctionResult;

/// Ordered list of bid ids stored under `bid_keys`.
///
/// Serialized as a bare JSON array of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BidKeyIndex {
    ids: Vec<String>,
}

impl BidKeyIndex {
    pub const fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Decode an index value. An empty value is an empty index.
    pub fn from_json_bytes(data: &[u8]) -> AuctionResult<Self> {
        if data.is_empty() {
            return Ok(Self::new());
        }
        crate::util::json_from_limited_slice(data, MAX_BID_INDEX_SIZE)
    }

    pub fn to_json_bytes(&self) -> AuctionResult<Vec<u8>> {
        crate::util::json_to_vec(self)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    /// Append an id unless it is already present.
    ///
    /// Returns `true` if the id was added.
    pub fn push_unique(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Ids in index order with repeats removed (first occurrence wins).
    pub fn unique_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.ids
            .iter()
            .map(String::as_str)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for BidKeyIndex {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}
