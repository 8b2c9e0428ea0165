//! Reading and writing bids through the contract store.

pub mod loader;
pub mod submission;

pub use loader::BidRegistry;
pub use submission::{BidDraft, BidSubmission, PreparedBid, SubmittedBid, ValidatedDraft};
