//! Headless auction dashboard for scripted and E2E testing.
//!
//! Drives the same flows as the GUI with JSON-over-stdio IPC.
//! Logging goes to stderr; stdout is reserved for the IPC protocol.
//!
//! Usage:
//!   auction-headless [--data-dir <path>]
//!
//! On startup, emits a `Ready` JSON line to stdout.
//! Then reads `HeadlessCommand` JSON lines from stdin and writes
//! `HeadlessResponse` lines.

use std::io::Write;
use std::path::PathBuf;

use auction::actions;
use auction::{
    AppState, AuctionConfig, AuctionError, BidDraft, BidFilter, FileStore, LocalWallet,
    StatusFilter,
};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// ── IPC types ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ReadyEvent {
    event: &'static str,
    account: Option<String>,
    store_path: String,
    sealing: &'static str,
}

#[derive(Deserialize)]
#[serde(tag = "cmd")]
enum HeadlessCommand {
    Connect,
    Disconnect,
    LoadBids,
    SubmitBid {
        land_parcel: String,
        bid_amount: String,
        #[serde(default)]
        bidder_note: String,
    },
    ListBids {
        #[serde(default)]
        search: String,
        #[serde(default)]
        status: Option<String>,
    },
    Stats,
    CheckAvailability,
    DetermineWinner,
    Notification,
    Shutdown,
}

#[derive(Serialize)]
#[serde(tag = "status")]
enum HeadlessResponse {
    Ok { data: Option<serde_json::Value> },
    Err { message: String },
}

impl HeadlessResponse {
    fn ok(data: serde_json::Value) -> Self {
        Self::Ok { data: Some(data) }
    }

    fn err(err: &AuctionError) -> Self {
        Self::Err {
            message: err.to_string(),
        }
    }
}

type HeadlessState = AppState<FileStore, LocalWallet>;

// ── Helpers ──────────────────────────────────────────────────────────

fn parse_data_dir() -> Option<PathBuf> {
    let args: Vec<String> = std::env::args().collect();
    args.iter()
        .position(|a| a == "--data-dir")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
}

fn init_logging_stderr() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .init();
}

fn emit_json(value: &impl Serialize) {
    let line = match serde_json::to_string(value) {
        Ok(line) => line,
        Err(e) => {
            error!("Failed to serialize response: {}", e);
            return;
        }
    };
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{line}").and_then(|()| stdout.flush()) {
        error!("stdout write failed: {}", e);
    }
}

fn parse_filter(search: String, status: Option<String>) -> Result<BidFilter, AuctionError> {
    let status = match status.as_deref() {
        None | Some("") => StatusFilter::All,
        Some(s) => s.parse()?,
    };
    Ok(BidFilter::new(search, status))
}

async fn handle(state: &HeadlessState, cmd: HeadlessCommand) -> HeadlessResponse {
    match cmd {
        HeadlessCommand::Connect => match actions::connect_wallet(state).await {
            Ok(account) => HeadlessResponse::ok(serde_json::json!({ "account": account })),
            Err(e) => HeadlessResponse::err(&e),
        },

        HeadlessCommand::Disconnect => {
            actions::disconnect_wallet(state);
            HeadlessResponse::Ok { data: None }
        }

        HeadlessCommand::LoadBids => match actions::load_bids(state).await {
            Ok(count) => HeadlessResponse::ok(serde_json::json!({ "count": count })),
            Err(e) => HeadlessResponse::err(&e),
        },

        HeadlessCommand::SubmitBid {
            land_parcel,
            bid_amount,
            bidder_note,
        } => {
            let draft = BidDraft::new(land_parcel, bid_amount, bidder_note);
            match actions::submit_bid(state, &draft).await {
                Ok(submitted) => HeadlessResponse::ok(serde_json::json!({
                    "id": submitted.bid.id,
                    "tx_id": submitted.receipt.tx_id,
                })),
                // Same wording the banner shows
                Err(e @ (AuctionError::WalletRequired | AuctionError::Validation(_))) => {
                    HeadlessResponse::err(&e)
                }
                Err(e) => HeadlessResponse::Err {
                    message: e.submission_message(),
                },
            }
        }

        HeadlessCommand::ListBids { search, status } => match parse_filter(search, status) {
            Ok(filter) => {
                state.set_filter(filter);
                match serde_json::to_value(state.rows()) {
                    Ok(rows) => HeadlessResponse::ok(serde_json::json!({ "bids": rows })),
                    Err(e) => HeadlessResponse::Err {
                        message: e.to_string(),
                    },
                }
            }
            Err(e) => HeadlessResponse::err(&e),
        },

        HeadlessCommand::Stats => {
            let stats = state.stats();
            HeadlessResponse::ok(serde_json::json!({
                "stats": stats,
                "distribution": stats.distribution(),
            }))
        }

        HeadlessCommand::CheckAvailability => match actions::check_availability(state).await {
            Ok(available) => HeadlessResponse::ok(serde_json::json!({ "available": available })),
            Err(e) => HeadlessResponse::err(&e),
        },

        HeadlessCommand::DetermineWinner => match actions::determine_winner(state).await {
            Ok(count) => HeadlessResponse::ok(serde_json::json!({ "count": count })),
            Err(e) => HeadlessResponse::err(&e),
        },

        HeadlessCommand::Notification => {
            HeadlessResponse::ok(serde_json::json!({
                "notification": state.notifications.current(),
            }))
        }

        HeadlessCommand::Shutdown => HeadlessResponse::Ok { data: None },
    }
}

// ── Main ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    init_logging_stderr();

    let mut config = match AuctionConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(dir) = parse_data_dir() {
        config.data_dir = dir;
    }
    info!("auction-headless starting (data dir {:?})", config.data_dir);

    let store = FileStore::new(config.store_path());
    let wallet = LocalWallet::from_account(config.account.clone());
    let state = HeadlessState::from_config(&config, store, wallet);

    if let Err(e) = actions::load_bids(&state).await {
        warn!("Initial bid load failed: {}", e);
    }

    emit_json(&ReadyEvent {
        event: "Ready",
        account: config.account.clone(),
        store_path: config.store_path().display().to_string(),
        sealing: config.sealer.as_str(),
    });
    info!("Ready event emitted");

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received");
                shutdown.cancel();
            }
        });
    }

    // Command loop
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        let next = tokio::select! {
            () = shutdown.cancelled() => break,
            next = lines.next_line() => next,
        };
        let line = match next {
            Ok(Some(l)) => l,
            Ok(None) => {
                info!("stdin closed, shutting down");
                break;
            }
            Err(e) => {
                error!("stdin read error: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let cmd: HeadlessCommand = match serde_json::from_str(&line) {
            Ok(c) => c,
            Err(e) => {
                emit_json(&HeadlessResponse::Err {
                    message: format!("Invalid command JSON: {e}"),
                });
                continue;
            }
        };

        let stop = matches!(cmd, HeadlessCommand::Shutdown);
        emit_json(&handle(&state, cmd).await);
        if stop {
            info!("Shutdown command received");
            break;
        }
    }

    shutdown.cancel();
    actions::disconnect_wallet(&state);
    info!("Shutdown complete");
}
