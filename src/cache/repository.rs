//! File-backed iteration cache
//!
//! One pretty-printed JSON file per iteration:
//!
//! ```text
//! {"version":"1.0","iterationId":"<key>","lastFetched":"<ISO-8601>","data":{...}}
//! ```
//!
//! Expiry is evaluated on read; nothing sweeps the directory in the
//! background. Concurrent writers of the same key from different processes
//! are last-writer-wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::fs;

use super::CACHE_VERSION;
use super::atomic::{TEMP_SUFFIX, write_atomic};
use super::key::{absolute_dir, resolve_within};
use crate::client::models::IterationPayload;
use crate::error::CacheError;

type Result<T> = std::result::Result<T, CacheError>;

/// On-disk cache unit
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheEntry {
    version: String,
    iteration_id: String,
    last_fetched: String,
    data: IterationPayload,
}

/// Only the version, read before committing to the full shape.
#[derive(Deserialize)]
struct EntryHeader {
    version: String,
}

/// Outcome of reading one cache file.
enum Lookup {
    Fresh(CacheEntry, DateTime<Utc>),
    Expired(DateTime<Utc>),
    /// Present but unusable without being corrupted
    Stale(&'static str),
}

/// Statistics about cache clear operation
#[derive(Debug, Default)]
pub struct ClearStats {
    pub entries_removed: usize,
}

/// Statistics about cache state
#[derive(Debug, Default)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
    pub corrupted_entries: usize,
    pub total_size_bytes: u64,
    pub oldest_entry: Option<DateTime<Utc>>,
    pub newest_entry: Option<DateTime<Utc>>,
}

/// Iteration payload cache rooted at one directory.
#[derive(Debug, Clone)]
pub struct IterationCacheRepository {
    dir: PathBuf,
    ttl_hours: f64,
    /// `None` when expiry is disabled
    ttl: Option<Duration>,
}

impl IterationCacheRepository {
    /// Create a repository rooted at `dir`.
    ///
    /// `ttl_hours` of 0 disables expiry; negative or non-finite values are
    /// rejected. A relative `dir` is resolved against the working directory
    /// once, here. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>, ttl_hours: f64) -> Result<Self> {
        if !ttl_hours.is_finite() || ttl_hours < 0.0 {
            return Err(CacheError::InvalidTtl(ttl_hours));
        }

        let ttl = (ttl_hours > 0.0)
            .then(|| Duration::milliseconds((ttl_hours * 3_600_000.0).round() as i64));

        Ok(Self {
            dir: absolute_dir(&dir.into())?,
            ttl_hours,
            ttl,
        })
    }

    /// Cache directory, absolute
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ttl_hours(&self) -> f64 {
        self.ttl_hours
    }

    /// File backing `key`, checked to lie inside the cache directory.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        resolve_within(&self.dir, key)
    }

    /// Cached payload for `key`, or `None` on a miss.
    ///
    /// Missing, expired, version-mismatched and unparsable-timestamp entries
    /// are misses. A file that is not a cache entry at all is
    /// [`CacheError::Corrupted`].
    pub async fn get(&self, key: &str) -> Result<Option<IterationPayload>> {
        let path = self.path_for(key)?;
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Cache miss: {}", key);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match self.inspect(key, &bytes)? {
            Lookup::Fresh(entry, _) => {
                debug!("Cache hit: {}", key);
                Ok(Some(entry.data))
            }
            Lookup::Expired(fetched) => {
                debug!("Cache expired: {} (fetched {})", key, fetched);
                Ok(None)
            }
            Lookup::Stale(reason) => {
                info!("Ignoring cache entry for {}: {}", key, reason);
                Ok(None)
            }
        }
    }

    /// Write a fresh entry for `key`, stamped with the current time.
    pub async fn set(&self, key: &str, payload: &IterationPayload) -> Result<()> {
        let path = self.path_for(key)?;
        let entry = CacheEntry {
            version: CACHE_VERSION.to_string(),
            iteration_id: key.to_string(),
            last_fetched: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            data: payload.clone(),
        };
        let json = serde_json::to_vec_pretty(&entry)
            .map_err(|e| CacheError::Serialize(e.to_string()))?;

        write_atomic(&path, &json).await?;
        debug!("Cached {} ({} bytes)", key, json.len());
        Ok(())
    }

    /// Whether `get(key)` would return a payload.
    #[allow(dead_code)]
    pub async fn has(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Delete the entry for `key`; a missing file is not an error.
    pub async fn clear(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Cleared cache entry: {}", key);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete every cache file, including abandoned temp files.
    pub async fn clear_all(&self) -> Result<ClearStats> {
        let mut stats = ClearStats::default();
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(stats),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_entry = name.ends_with(".json");
            if !is_entry && !name.ends_with(TEMP_SUFFIX) {
                continue;
            }
            if !entry.file_type().await?.is_file() {
                debug!("Skipping non-file cache entry: {}", name);
                continue;
            }
            match fs::remove_file(entry.path()).await {
                Ok(()) if is_entry => stats.entries_removed += 1,
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        debug!("Cleared {} cache entries", stats.entries_removed);
        Ok(stats)
    }

    /// Summarize every entry in the cache directory.
    pub async fn stats(&self) -> Result<CacheStats> {
        let mut stats = CacheStats::default();
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(stats),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(stem) = name.strip_suffix(".json") else {
                continue;
            };
            if !entry.file_type().await?.is_file() {
                continue;
            }

            let bytes = match fs::read(entry.path()).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            stats.total_entries += 1;
            stats.total_size_bytes += bytes.len() as u64;

            let fetched = match self.inspect(stem, &bytes) {
                Ok(Lookup::Fresh(_, fetched)) => {
                    stats.valid_entries += 1;
                    Some(fetched)
                }
                Ok(Lookup::Expired(fetched)) => {
                    stats.expired_entries += 1;
                    Some(fetched)
                }
                Ok(Lookup::Stale(_)) => {
                    stats.expired_entries += 1;
                    None
                }
                Err(e) => {
                    warn!("{}", e);
                    stats.corrupted_entries += 1;
                    None
                }
            };

            if let Some(fetched) = fetched {
                stats.oldest_entry = Some(stats.oldest_entry.map_or(fetched, |o| o.min(fetched)));
                stats.newest_entry = Some(stats.newest_entry.map_or(fetched, |n| n.max(fetched)));
            }
        }

        Ok(stats)
    }

    /// Classify raw file contents for `key`.
    fn inspect(&self, key: &str, bytes: &[u8]) -> Result<Lookup> {
        let corrupted = |reason: String| CacheError::Corrupted {
            key: key.to_string(),
            reason,
        };

        let value: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|e| corrupted(format!("invalid JSON: {}", e)))?;

        let header: EntryHeader = serde_json::from_value(value.clone())
            .map_err(|e| corrupted(format!("not a cache entry: {}", e)))?;
        if header.version != CACHE_VERSION {
            return Ok(Lookup::Stale("cache format version mismatch"));
        }

        let entry: CacheEntry = serde_json::from_value(value)
            .map_err(|e| corrupted(format!("not a cache entry: {}", e)))?;

        let Ok(fetched) = DateTime::parse_from_rfc3339(&entry.last_fetched) else {
            return Ok(Lookup::Stale("unparsable lastFetched timestamp"));
        };
        let fetched = fetched.with_timezone(&Utc);

        match self.ttl {
            Some(ttl) if Utc::now() - fetched > ttl => Ok(Lookup::Expired(fetched)),
            _ => Ok(Lookup::Fresh(entry, fetched)),
        }
    }
}
