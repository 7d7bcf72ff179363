//! Bearer token caching.
//!
//! The client never holds the cache itself; it talks to a [`TokenStore`]
//! keyed by a string derived from the server URL and credential identity.
//! [`MemoryTokenStore::shared`] is the process-wide default, while
//! [`FileTokenStore`] lets short-lived CLI processes reuse a token.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("Token file I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Token file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage for bearer tokens with a time-to-live
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Return the token for `key` if present and not expired
    async fn get(&self, key: &str) -> Result<Option<String>, TokenStoreError>;

    /// Store `token` under `key`, replacing any previous entry
    async fn set(&self, key: &str, token: &str, ttl: Duration) -> Result<(), TokenStoreError>;

    /// Drop the entry for `key`
    async fn invalidate(&self, key: &str) -> Result<(), TokenStoreError>;
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    token: String,
    expires_at: Instant,
}

/// In-memory token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: RwLock<HashMap<String, MemoryEntry>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide store shared by every client that does not inject its own
    pub fn shared() -> Arc<MemoryTokenStore> {
        static INSTANCE: OnceLock<Arc<MemoryTokenStore>> = OnceLock::new();
        INSTANCE.get_or_init(|| Arc::new(MemoryTokenStore::new())).clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self, key: &str) -> Result<Option<String>, TokenStoreError> {
        // Fast path: read lock
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Ok(Some(entry.token.clone()))
                }
                Some(_) => {}
            }
        }

        // Expired: drop it unless someone replaced it meanwhile
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| e.expires_at <= Instant::now()) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, token: &str, ttl: Duration) -> Result<(), TokenStoreError> {
        let entry = MemoryEntry {
            token: token.to_string(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> Result<(), TokenStoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FileEntry {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Token store persisted as a JSON map on disk
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> TokenStoreError {
        TokenStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    async fn load(&self) -> Result<HashMap<String, FileEntry>, TokenStoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(HashMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    async fn save(&self, entries: &HashMap<String, FileEntry>) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| self.io_error(e))
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self, key: &str) -> Result<Option<String>, TokenStoreError> {
        let _guard = self.lock.lock().await;
        let entries = self.load().await?;
        Ok(entries
            .get(key)
            .filter(|e| e.expires_at > Utc::now())
            .map(|e| e.token.clone()))
    }

    async fn set(&self, key: &str, token: &str, ttl: Duration) -> Result<(), TokenStoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        let now = Utc::now();
        entries.retain(|_, e| e.expires_at > now);

        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero());
        entries.insert(
            key.to_string(),
            FileEntry {
                token: token.to_string(),
                expires_at: now + ttl,
            },
        );
        self.save(&entries).await
    }

    async fn invalidate(&self, key: &str) -> Result<(), TokenStoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        if entries.remove(key).is_some() {
            self.save(&entries).await?;
        }
        Ok(())
    }
}
