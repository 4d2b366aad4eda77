//! In-memory response cache keyed by request signature.
//!
//! A [`ResponseCache`] is created empty, owned by whoever constructs it, and
//! handed to a [`QuoteClient`](crate::QuoteClient). Entries are written once per
//! successful network fetch and dropped on [`ResponseCache::clear`], when read
//! after their TTL, or with the cache itself. [`ResponseCache::save`] and
//! [`ResponseCache::load`] persist entries to a JSON file on request only.

use std::{
    collections::HashMap,
    fmt, fs,
    path::Path,
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::{Endpoint, Params};

/// Deterministic request signature: endpoint path plus sorted parameters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(endpoint: Endpoint, params: &Params) -> Self {
        let query = params
            .query_pairs()
            .iter()
            .map(|(key, value)| format!("{}={}", escape(key), escape(value)))
            .collect::<Vec<_>>()
            .join("&");
        Self(format!("GET {}?{query}", endpoint.path()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn escape(raw: &str) -> String {
    raw.replace('%', "%25")
        .replace('&', "%26")
        .replace('=', "%3D")
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct CacheEntry {
    payload: JsonValue,
    stored_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize)]
struct CacheFile {
    entries: Vec<PersistedEntry>,
}

#[derive(Serialize, Deserialize)]
struct PersistedEntry {
    key: CacheKey,
    #[serde(flatten)]
    entry: CacheEntry,
}

/// Response payloads keyed by [`CacheKey`], with an optional time-to-live.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    ttl: Option<Duration>,
}

impl ResponseCache {
    /// Creates an empty cache whose entries never expire.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache whose entries expire `ttl` after being stored.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::default(),
            ttl: Some(ttl),
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Returns the stored payload if present and not expired.
    ///
    /// An expired entry is removed as part of the lookup.
    pub fn get(&self, key: &CacheKey) -> Option<JsonValue> {
        let now = Utc::now();
        let mut entries = self.lock();
        let entry = entries.get(key)?;
        if self.is_fresh(entry, now) {
            #[cfg(feature = "tracing")]
            tracing::debug!(key = %key, "cache hit");
            return Some(entry.payload.clone());
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(key = %key, "cache entry expired");
        entries.remove(key);
        None
    }

    /// Stores a payload under `key`, replacing any previous entry.
    pub fn insert(&self, key: CacheKey, payload: JsonValue) {
        let entry = CacheEntry {
            payload,
            stored_at: Utc::now(),
        };
        self.lock().insert(key, entry);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Writes all entries to `path` as JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let file = {
            let entries = self.lock();
            let mut entries: Vec<PersistedEntry> = entries
                .iter()
                .map(|(key, entry)| PersistedEntry {
                    key: key.clone(),
                    entry: entry.clone(),
                })
                .collect();
            entries.sort_by(|a, b| a.key.as_str().cmp(b.key.as_str()));
            CacheFile { entries }
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }

    /// Restores a cache previously written by [`ResponseCache::save`].
    ///
    /// Entry timestamps are kept, so entries older than `ttl` are already stale.
    pub fn load(path: &Path, ttl: Option<Duration>) -> std::io::Result<Self> {
        let content = fs::read_to_string(path)?;
        let file: CacheFile = serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let entries = file
            .entries
            .into_iter()
            .map(|persisted| (persisted.key, persisted.entry))
            .collect();
        Ok(Self {
            entries: Mutex::new(entries),
            ttl,
        })
    }

    fn is_fresh(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        let Some(ttl) = self.ttl else {
            return true;
        };
        let Ok(ttl) = chrono::Duration::from_std(ttl) else {
            return true;
        };
        entry
            .stored_at
            .checked_add_signed(ttl)
            .map_or(true, |expires_at| now < expires_at)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        // Entries are plain data; a panic mid-insert leaves nothing half-written.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
