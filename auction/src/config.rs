//! Configuration for the auction dashboard.
//!
//! Constants for store keys, notification timings and size limits live here,
//! alongside `AuctionConfig`, which is read from the environment by both
//! binaries.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::crypto::{AesGcmSealer, BidSealer, ContentKey, PlaceholderSealer};
use crate::error::{AuctionError, AuctionResult};

/// Store key holding the JSON array of bid ids.
pub const BID_INDEX_KEY: &str = "bid_keys";

/// Prefix of the per-bid payload keys (`bid_{id}`).
pub const BID_KEY_PREFIX: &str = "bid_";

/// Store key for a single bid payload.
pub fn bid_payload_key(id: &str) -> String {
    format!("{BID_KEY_PREFIX}{id}")
}

/// Maximum size accepted for a single stored bid payload.
pub const MAX_STORE_VALUE_SIZE: usize = 32_768;

/// Maximum size accepted for the `bid_keys` index, roughly 170k ids.
pub const MAX_BID_INDEX_SIZE: usize = 4 * 1024 * 1024;

/// Maximum length of the private note, in bytes.
pub const MAX_BIDDER_NOTE_LEN: usize = 4_096;

/// Attempts at the conditional index write before giving up to other writers.
pub const MAX_INDEX_WRITE_ATTEMPTS: usize = 8;

/// Number of base36 characters appended to a generated bid id.
pub const BID_ID_SUFFIX_LEN: usize = 7;

/// Auto-dismiss delay for status and error notifications.
pub const STATUS_DISMISS: Duration = Duration::from_secs(3);

/// Auto-dismiss delay for the "bid submitted" notification.
pub const SUBMIT_SUCCESS_DISMISS: Duration = Duration::from_secs(2);

/// Interval at which the dashboard copies shared state into UI signals.
pub const UI_REFRESH_INTERVAL: Duration = Duration::from_millis(250);

/// Environment variable overriding the data directory.
pub const AUCTION_DATA_DIR_ENV: &str = "AUCTION_DATA_DIR";

/// Environment variable holding the development wallet address.
pub const AUCTION_ACCOUNT_ENV: &str = "AUCTION_ACCOUNT";

/// Environment variable holding a hex-encoded 32-byte sealing key.
pub const AUCTION_SEALING_KEY_ENV: &str = "AUCTION_SEALING_KEY";

/// Environment variable selecting the sealing scheme (`aes` or `placeholder`).
pub const AUCTION_SEALER_ENV: &str = "AUCTION_SEALER";

/// File name of the local development store inside the data directory.
pub const STORE_FILE_NAME: &str = "auction-store.json";

/// Which [`BidSealer`] implementation to use for new bids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SealerKind {
    /// AES-256-GCM with a key held by the bidder.
    #[default]
    Aes,
    /// Base64 encoding compatible with the legacy web client. Not private.
    Placeholder,
}

impl SealerKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aes => "aes",
            Self::Placeholder => "placeholder",
        }
    }
}

impl std::str::FromStr for SealerKind {
    type Err = AuctionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aes" | "aes-gcm" => Ok(Self::Aes),
            "placeholder" | "legacy" => Ok(Self::Placeholder),
            other => Err(AuctionError::Validation(format!(
                "Unknown sealer '{other}' (expected 'aes' or 'placeholder')"
            ))),
        }
    }
}

/// Runtime configuration shared by the GUI and headless binaries.
#[derive(Debug, Clone)]
pub struct AuctionConfig {
    pub data_dir: PathBuf,
    pub account: Option<String>,
    pub sealing_key: Option<ContentKey>,
    pub sealer: SealerKind,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            account: None,
            sealing_key: None,
            sealer: SealerKind::default(),
        }
    }
}

impl AuctionConfig {
    /// Build the configuration from `AUCTION_*` environment variables.
    pub fn from_env() -> AuctionResult<Self> {
        let data_dir = std::env::var(AUCTION_DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        let account = std::env::var(AUCTION_ACCOUNT_ENV)
            .ok()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());

        let sealing_key = match std::env::var(AUCTION_SEALING_KEY_ENV) {
            Ok(hex_key) => Some(parse_sealing_key(&hex_key)?),
            Err(_) => None,
        };

        let sealer = match std::env::var(AUCTION_SEALER_ENV) {
            Ok(kind) => kind.parse()?,
            Err(_) => SealerKind::default(),
        };

        Ok(Self {
            data_dir,
            account,
            sealing_key,
            sealer,
        })
    }

    /// Path of the local development store file.
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE_NAME)
    }

    /// Construct the configured sealer. Without a configured key a fresh one
    /// is generated, so bids sealed in this run can only be opened in it.
    pub fn build_sealer(&self) -> Arc<dyn BidSealer> {
        match self.sealer {
            SealerKind::Aes => match self.sealing_key {
                Some(key) => Arc::new(AesGcmSealer::new(key)),
                None => Arc::new(AesGcmSealer::generate()),
            },
            SealerKind::Placeholder => Arc::new(PlaceholderSealer),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("land-auction")
}

fn parse_sealing_key(hex_key: &str) -> AuctionResult<ContentKey> {
    let bytes = hex::decode(hex_key.trim())
        .map_err(|e| AuctionError::Validation(format!("{AUCTION_SEALING_KEY_ENV} is not hex: {e}")))?;
    ContentKey::try_from(bytes.as_slice()).map_err(|_| {
        AuctionError::Validation(format!(
            "{AUCTION_SEALING_KEY_ENV} must be 32 bytes, got {}",
            bytes.len()
        ))
    })
}
