//! Analysis history storage
//!
//! Persists analysis outcomes to a sled database for dashboards and audit.
//! Keys are millisecond timestamps as big-endian bytes, so iteration order
//! is chronological and reverse iteration yields newest-first.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use crate::types::AnalysisReport;

/// Error type for storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One stored analysis with the moment it was produced.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HistoryEntry {
    /// Unix timestamp in milliseconds
    pub timestamp_ms: u64,
    pub report: AnalysisReport,
}

/// Sled-backed history of analysis outcomes.
///
/// Note: writes are not flushed individually; sled's background flushing
/// provides durability. On crash the last few analyses may be lost, which
/// is acceptable; callers already received their response.
#[derive(Clone)]
pub struct HistoryStorage {
    db: Arc<sled::Db>,
}

impl HistoryStorage {
    /// Open or create the history database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Store an analysis outcome, keyed by the current time. Returns the
    /// assigned timestamp. When two analyses land in the same millisecond
    /// the key is bumped forward so neither overwrites the other.
    pub fn store(&self, report: &AnalysisReport) -> Result<u64, StorageError> {
        let mut timestamp_ms = Utc::now().timestamp_millis().max(0) as u64;
        while self.db.contains_key(timestamp_ms.to_be_bytes())? {
            timestamp_ms += 1;
        }
        self.store_at(timestamp_ms, report)?;
        Ok(timestamp_ms)
    }

    /// Store an analysis outcome at an explicit timestamp (tests, replay).
    pub fn store_at(&self, timestamp_ms: u64, report: &AnalysisReport) -> Result<(), StorageError> {
        let entry = HistoryEntry {
            timestamp_ms,
            report: report.clone(),
        };
        let value = serde_json::to_vec(&entry)?;
        self.db.insert(timestamp_ms.to_be_bytes(), value)?;
        Ok(())
    }

    /// The most recent `limit` entries, newest first. Undecodable records
    /// are skipped.
    pub fn recent(&self, limit: usize) -> Vec<HistoryEntry> {
        let mut entries = Vec::with_capacity(limit.min(64));
        for item in self.db.iter().rev() {
            if entries.len() >= limit {
                break;
            }
            if let Ok((_, value)) = item {
                if let Ok(entry) = serde_json::from_slice::<HistoryEntry>(&value) {
                    entries.push(entry);
                }
            }
        }
        entries
    }

    /// Total number of stored analyses.
    pub fn count(&self) -> usize {
        self.db.len()
    }

    /// Delete entries older than `keep_days`. Returns the number removed.
    pub fn prune_older_than(&self, keep_days: u32) -> Result<usize, StorageError> {
        let cutoff_ms = (Utc::now().timestamp_millis().max(0) as u64)
            .saturating_sub(u64::from(keep_days) * 24 * 60 * 60 * 1000);
        let cutoff_key = cutoff_ms.to_be_bytes();

        let stale: Vec<Vec<u8>> = self
            .db
            .iter()
            .filter_map(|item| {
                item.ok().and_then(|(key, _)| {
                    (key.as_ref() < cutoff_key.as_slice()).then(|| key.to_vec())
                })
            })
            .collect();

        let deleted = stale.len();
        for key in stale {
            self.db.remove(key)?;
        }
        if deleted > 0 {
            self.db.flush()?;
        }
        Ok(deleted)
    }

    /// Remove all entries. Destructive; used by `--reset-history`.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.db.clear()?;
        self.db.flush()?;
        Ok(())
    }
}
