//! Transient result storage.
//!
//! Hands a [`ReorganizationSummary`] from the run that produced it to the
//! next invocation that renders it. Records auto-expire after a short TTL
//! and are removed when consumed.

use crate::models::result::ReorganizationSummary;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// How long a stored summary stays consumable.
pub const TRANSIENT_TTL_SECS: i64 = 30;

#[derive(Debug, Serialize, Deserialize)]
struct TransientRecord {
    expires_at: chrono::DateTime<chrono::Utc>,
    summary: ReorganizationSummary,
}

/// File-backed expiring key-value store for run summaries.
#[derive(Debug, Clone)]
pub struct TransientStore {
    dir: PathBuf,
}

impl TransientStore {
    /// Create a store rooted at the given directory.
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    fn record_path(&self, key: &str) -> PathBuf {
        // Keys are run IDs; anything else is sanitized to a safe filename.
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }

    /// Store a summary under a key.
    pub fn set(&self, key: &str, summary: &ReorganizationSummary) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        let record = TransientRecord {
            expires_at: chrono::Utc::now() + chrono::Duration::seconds(TRANSIENT_TTL_SECS),
            summary: summary.clone(),
        };

        let path = self.record_path(key);
        let mut file = std::fs::File::create(&path)?;
        file.write_all(serde_json::to_string_pretty(&record)?.as_bytes())?;

        tracing::debug!("Transient summary stored: {:?}", path);
        Ok(())
    }

    /// Consume the summary stored under a key. The record is removed whether
    /// it was still live or already expired.
    pub fn take(&self, key: &str) -> Result<Option<ReorganizationSummary>> {
        let path = self.record_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;
        std::fs::remove_file(&path)?;

        let record: TransientRecord = match serde_json::from_str(&content) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Discarding unreadable transient {:?}: {}", path, e);
                return Ok(None);
            }
        };

        if record.expires_at < chrono::Utc::now() {
            return Ok(None);
        }
        Ok(Some(record.summary))
    }

    /// Consume the most recently stored live summary, sweeping out every
    /// expired record along the way.
    pub fn take_latest(&self) -> Result<Option<ReorganizationSummary>> {
        if !self.dir.exists() {
            return Ok(None);
        }

        let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let modified = entry.metadata()?.modified()?;
            if newest.as_ref().map(|(m, _)| modified > *m).unwrap_or(true) {
                newest = Some((modified, path));
            }
        }

        let result = match newest {
            Some((_, path)) => {
                let key = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default();
                self.take(&key)?
            }
            None => None,
        };

        self.sweep_expired()?;
        Ok(result)
    }

    fn sweep_expired(&self) -> Result<()> {
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let expired = std::fs::read_to_string(&path)
                .ok()
                .and_then(|content| serde_json::from_str::<TransientRecord>(&content).ok())
                .map(|record| record.expires_at < chrono::Utc::now())
                .unwrap_or(true);
            if expired {
                let _ = std::fs::remove_file(&path);
            }
        }
        Ok(())
    }
}
