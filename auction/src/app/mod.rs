//! Application modules for the land auction dashboard UI.

pub mod components;
pub mod state;

pub use components::app;
pub use state::{DashboardState, SHARED_STATE};
