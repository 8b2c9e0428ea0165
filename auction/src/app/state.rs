//! Application state handoff.
//!
//! `main` builds one `DashboardState` and hands it to the Dioxus UI via a
//! `OnceLock`. Inside the Dioxus tree, components access it through
//! `use_context`.

use auction::{AppState, FileStore, LocalWallet};

/// State type the GUI runs with.
pub type DashboardState = AppState<FileStore, LocalWallet>;

/// Single static for the main -> Dioxus handoff.
pub static SHARED_STATE: std::sync::OnceLock<DashboardState> = std::sync::OnceLock::new();
