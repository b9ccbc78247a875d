use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tracing::warn;

use crate::error::StoreError;

/// Opaque durable key-value store. Last write wins; no transactions
/// across keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}

/// In-memory store for tests and ephemeral sessions. Writes can be made to
/// fail to simulate a flaky backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self {
            entries: Mutex::new(map),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Synchronous peek for assertions.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("write to {} rejected", key)));
        }
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".to_string()))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Whole-file JSON object store. Every write rewrites the snapshot.
pub struct FileStore {
    path: PathBuf,
    cache: tokio::sync::Mutex<Option<BTreeMap<String, String>>>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: tokio::sync::Mutex::new(None),
        }
    }

    /// Where an unreadable state file is moved before the store starts over.
    pub fn quarantine_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".corrupt");
        PathBuf::from(name)
    }

    /// An unparseable body is moved aside and treated as empty, so the next
    /// write replaces it instead of failing forever.
    async fn read_snapshot(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        match serde_json::from_str(&content) {
            Ok(map) => Ok(map),
            Err(e) => {
                let aside = self.quarantine_path();
                warn!(
                    path = %self.path.display(),
                    aside = %aside.display(),
                    "State file unreadable, starting empty: {}",
                    e
                );
                if let Err(e) = tokio::fs::rename(&self.path, &aside).await {
                    warn!(path = %self.path.display(), "Could not move state file aside: {}", e);
                }
                Ok(BTreeMap::new())
            }
        }
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut cache = self.cache.lock().await;
        if cache.is_none() {
            *cache = Some(self.read_snapshot().await?);
        }
        Ok(cache.as_ref().and_then(|m| m.get(key).cloned()))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut cache = self.cache.lock().await;
        let mut snapshot = match cache.take() {
            Some(map) => map,
            None => self.read_snapshot().await?,
        };
        snapshot.insert(key.to_string(), value);

        let json = serde_json::to_string_pretty(&snapshot)?;
        let result = tokio::fs::write(&self.path, json).await;
        // Keep the cache in step with memory even if the disk write failed;
        // the manager retries the key later.
        *cache = Some(snapshot);
        result.map_err(StoreError::from)
    }
}
