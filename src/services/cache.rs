use crate::domain::models::Cafe;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    key: String,
    fetched_at: u64,
    last_used: u64,
    cafes: Vec<Cafe>,
}

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub fn default_cache_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home)
        .join(".cache")
        .join("cafes")
        .join("queries"))
}

/// On-disk cache of list queries (`all`, `search:<loc>`).
///
/// Entries are served only while fresh (`stale_after`) and removed once
/// nothing has read them for `evict_after`.
#[derive(Debug, Clone)]
pub struct QueryCache {
    dir: PathBuf,
    stale_after: u64,
    evict_after: u64,
}

impl QueryCache {
    pub fn new(dir: impl Into<PathBuf>, stale_after: u64, evict_after: u64) -> Self {
        Self {
            dir: dir.into(),
            stale_after,
            evict_after,
        }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        self.dir
            .join(format!("{}.json", hex::encode(hasher.finalize())))
    }

    fn read(path: &Path) -> Option<CacheEntry> {
        let raw = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "dropping unreadable cache entry");
                let _ = std::fs::remove_file(path);
                None
            }
        }
    }

    fn write(path: &Path, entry: &CacheEntry) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string(entry)?)?;
        Ok(())
    }

    fn evicted(&self, entry: &CacheEntry, now: u64) -> bool {
        now.saturating_sub(entry.last_used) >= self.evict_after
    }

    /// Fresh cached result for `key`, if any.
    pub fn get(&self, key: &str, now: u64) -> Option<Vec<Cafe>> {
        let path = self.entry_path(key);
        let mut entry = Self::read(&path)?;
        if entry.key != key {
            return None;
        }
        if self.evicted(&entry, now) {
            debug!(key, "cache entry evicted");
            let _ = std::fs::remove_file(&path);
            return None;
        }
        if now.saturating_sub(entry.fetched_at) >= self.stale_after {
            debug!(key, "cache entry stale");
            return None;
        }
        entry.last_used = now;
        if let Err(e) = Self::write(&path, &entry) {
            warn!(key, error = %e, "failed to touch cache entry");
        }
        debug!(key, count = entry.cafes.len(), "cache hit");
        Some(entry.cafes)
    }

    pub fn put(&self, key: &str, cafes: &[Cafe], now: u64) -> anyhow::Result<()> {
        let entry = CacheEntry {
            key: key.to_string(),
            fetched_at: now,
            last_used: now,
            cafes: cafes.to_vec(),
        };
        Self::write(&self.entry_path(key), &entry)
    }

    fn entries(&self) -> anyhow::Result<Vec<PathBuf>> {
        if !self.dir.exists() {
            return Ok(vec![]);
        }
        let mut out = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "json") {
                out.push(path);
            }
        }
        Ok(out)
    }

    pub fn invalidate_all(&self) -> anyhow::Result<usize> {
        let mut removed = 0usize;
        for path in self.entries()? {
            std::fs::remove_file(path)?;
            removed += 1;
        }
        Ok(removed)
    }

    /// Remove every entry past the eviction window. Returns how many went.
    pub fn prune(&self, now: u64) -> anyhow::Result<usize> {
        let mut removed = 0usize;
        for path in self.entries()? {
            let expired = match Self::read(&path) {
                Some(entry) => self.evicted(&entry, now),
                None => false,
            };
            if expired {
                std::fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
