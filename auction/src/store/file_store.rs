use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use data_encoding::BASE64;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::traits::{KvStore, Precondition, TxReceipt};

/// How long a writer waits for another process to release the store.
const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Poll interval while waiting for the lock file.
const LOCK_RETRY: Duration = Duration::from_millis(20);

/// Lock files older than this are left over from a crashed writer.
const STALE_LOCK_AGE: Duration = Duration::from_secs(30);

/// Local stand-in for the auction contract's key/value storage.
///
/// Values are kept base64-encoded in a single JSON object on disk. Every
/// transaction rewrites the file through a temp file and a rename, so a
/// multi-key write either lands completely or not at all. Writers are
/// serialized within a process by a mutex and across processes (the GUI and
/// the headless driver sharing a data dir) by a `.lock` file next to the
/// store.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

type StoreMap = BTreeMap<String, String>;

/// Removes the lock file when the transaction ends.
struct LockFile {
    path: PathBuf,
}

impl Drop for LockFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!("Failed to release {}: {}", self.path.display(), e);
        }
    }
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("json.lock")
    }

    async fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        Ok(())
    }

    async fn acquire_lock_file(&self) -> Result<LockFile> {
        let path = self.lock_path();
        let deadline = tokio::time::Instant::now() + LOCK_TIMEOUT;
        loop {
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(_) => return Ok(LockFile { path }),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    if lock_is_stale(&path).await {
                        warn!("Removing stale store lock {}", path.display());
                        let _ = tokio::fs::remove_file(&path).await;
                        continue;
                    }
                    if tokio::time::Instant::now() >= deadline {
                        bail!("Store {} is locked by another writer", self.path.display());
                    }
                    tokio::time::sleep(LOCK_RETRY).await;
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to create {}", path.display()))
                }
            }
        }
    }

    async fn read_map(&self) -> Result<StoreMap> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(StoreMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("Corrupt store file {}", self.path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreMap::new()),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", self.path.display())),
        }
    }

    async fn write_map(&self, map: &StoreMap) -> Result<()> {
        let tmp = self
            .path
            .with_extension(format!("json.{}.tmp", hex::encode(rand::random::<[u8; 4]>())));
        let bytes = serde_json::to_vec_pretty(map)?;
        tokio::fs::write(&tmp, bytes)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e).with_context(|| format!("Failed to replace {}", self.path.display()));
        }
        Ok(())
    }

    async fn apply_if(
        &self,
        condition: Precondition,
        entries: Vec<(String, Vec<u8>)>,
    ) -> Result<Option<TxReceipt>> {
        let _guard = self.write_lock.lock().await;
        self.ensure_parent().await?;
        let _lock = self.acquire_lock_file().await?;

        let mut map = self.read_map().await?;
        let current = decode_value(&map, &condition.key)?;
        if current != condition.expected {
            debug!("FileStore condition on {} no longer holds", condition.key);
            return Ok(None);
        }

        let keys_written = entries.len();
        for (key, value) in entries {
            map.insert(key, BASE64.encode(&value));
        }
        self.write_map(&map).await?;

        let tx_id = format!("0x{}", hex::encode(rand::random::<[u8; 16]>()));
        debug!("FileStore committed {} keys as {}", keys_written, tx_id);
        Ok(Some(TxReceipt {
            tx_id,
            keys_written,
        }))
    }
}

fn decode_value(map: &StoreMap, key: &str) -> Result<Vec<u8>> {
    match map.get(key) {
        Some(encoded) => BASE64
            .decode(encoded.as_bytes())
            .with_context(|| format!("Corrupt value for key {key}")),
        None => Ok(Vec::new()),
    }
}

async fn lock_is_stale(path: &std::path::Path) -> bool {
    let Ok(meta) = tokio::fs::metadata(path).await else {
        return false;
    };
    meta.modified()
        .ok()
        .and_then(|modified| SystemTime::now().duration_since(modified).ok())
        .is_some_and(|age| age > STALE_LOCK_AGE)
}

#[async_trait]
impl KvStore for FileStore {
    /// Available when the store file exists or its directory can hold one.
    async fn is_available(&self) -> Result<bool> {
        if tokio::fs::try_exists(&self.path).await? {
            return Ok(true);
        }
        Ok(self.ensure_parent().await.is_ok())
    }

    async fn get_data(&self, key: &str) -> Result<Vec<u8>> {
        let map = self.read_map().await?;
        decode_value(&map, key)
    }

    async fn set_many_if(
        &self,
        condition: Precondition,
        entries: Vec<(String, Vec<u8>)>,
    ) -> Result<Option<TxReceipt>> {
        self.apply_if(condition, entries).await
    }
}
