pub mod bid;
pub mod bid_index;

pub use bid::{Bid, BidPayload, BidStatus, LandParcel};
pub use bid_index::BidKeyIndex;
