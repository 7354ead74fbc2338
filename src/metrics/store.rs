//! Persisted metric values
//!
//! A single JSON object keyed by metric ID. Every save is a
//! read-modify-write of the whole file, replaced atomically.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;
use tokio::fs;
use tokio::sync::Mutex;

use super::Metric;
use crate::cache::write_atomic;
use crate::error::{CacheError, Result};

/// Default metrics file, relative to the working directory
pub const DEFAULT_METRICS_PATH: &str = "cache/metrics.json";

pub struct MetricsStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl MetricsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored metric by ID; empty when the file does not exist.
    pub async fn load_all(&self) -> Result<BTreeMap<String, Metric>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&bytes).map_err(|e| {
            CacheError::Corrupted {
                key: self.path.display().to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Insert or replace `metrics` by ID.
    pub async fn save(&self, metrics: &[Metric]) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut all = self.load_all().await?;
        for metric in metrics {
            all.insert(metric.id.clone(), metric.clone());
        }

        let json = serde_json::to_vec_pretty(&all)?;
        write_atomic(&self.path, &json).await?;
        debug!("Saved {} metrics to {}", metrics.len(), self.path.display());
        Ok(())
    }

    /// Delete the metrics file. Returns whether there was one.
    pub async fn clear(&self) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
