//! Land auction dashboard - Main entry point.
// Dioxus rsx! macro generates deeply nested types requiring higher recursion limit
#![recursion_limit = "512"]

mod app;

use auction::{AuctionConfig, AuctionResult, FileStore, LocalWallet};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::app::{DashboardState, SHARED_STATE};

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> AuctionResult<()> {
    init_logging();
    info!("Starting land auction dashboard");

    let config = AuctionConfig::from_env()?;
    info!("Using store file: {:?}", config.store_path());
    if config.account.is_none() {
        warn!("No wallet account configured; bids can be browsed but not submitted");
    }

    let store = FileStore::new(config.store_path());
    let wallet = LocalWallet::from_account(config.account.clone());
    let app_state = DashboardState::from_config(&config, store, wallet);
    SHARED_STATE.set(app_state).ok();

    // Launch Dioxus UI (blocks until window is closed)
    dioxus::launch(app::app);

    info!("UI closed, shutting down...");
    Ok(())
}
