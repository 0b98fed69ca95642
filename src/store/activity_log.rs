// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Append-only activity change log persisted as a JSON file.
//!
//! Every user action appends one row; rows are never deleted. The only
//! in-place mutations are stamping sync metadata once the backend has
//! acknowledged a change, and folding in authoritative rows after a remote
//! pull. A single mutex serializes all access so concurrent submissions
//! cannot interleave partial writes.

use crate::error::{AppError, Result};
use crate::models::ActivityRecord;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

struct LogInner {
    /// `None` for an ephemeral in-memory log.
    path: Option<PathBuf>,
    records: Mutex<Vec<ActivityRecord>>,
}

/// Handle to the local activity log. Cheap to clone; all clones share the
/// same underlying log.
#[derive(Clone)]
pub struct ActivityLog {
    inner: Arc<LogInner>,
}

impl ActivityLog {
    /// Open the log at `path`, loading any existing records.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    AppError::Store(format!("Failed to create store directory: {}", e))
                })?;
            }
        }

        let records: Vec<ActivityRecord> = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::Internal(anyhow::anyhow!(
                    "Corrupt activity log {}: {}",
                    path.display(),
                    e
                ))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(AppError::Store(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        tracing::debug!(path = %path.display(), count = records.len(), "Opened activity log");

        Ok(Self {
            inner: Arc::new(LogInner {
                path: Some(path),
                records: Mutex::new(records),
            }),
        })
    }

    /// Create an ephemeral log that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(LogInner {
                path: None,
                records: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Whether two handles refer to the same underlying log.
    pub fn same_log(&self, other: &ActivityLog) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Append one change row.
    pub async fn append(&self, record: ActivityRecord) -> Result<()> {
        let mut records = self.inner.records.lock().await;
        records.push(record);
        self.persist(&records).await
    }

    /// All rows in append order (full scan; per-user counts are small).
    pub async fn all(&self) -> Vec<ActivityRecord> {
        self.inner.records.lock().await.clone()
    }

    /// Stamp sync metadata on every still-unsynced row of one activity.
    pub async fn mark_synced(&self, id: &str, user_id: &str, date: DateTime<Utc>) -> Result<()> {
        let mut records = self.inner.records.lock().await;
        for record in records.iter_mut() {
            if record.id == id && record.user_id.is_none() {
                record.user_id = Some(user_id.to_string());
                record.date_of_change = Some(date);
            }
        }
        self.persist(&records).await
    }

    /// Fold the authoritative backend rows into the log, per-id
    /// last-write-wins: synced rows the backend re-sent are replaced, rows
    /// the backend did not mention are kept (a just-acknowledged push may
    /// not show up in the very next pull), and unsynced local rows always
    /// survive. Authoritative rows go first so a pending local edit of the
    /// same activity still wins when the newest row per id is selected.
    pub async fn merge_remote(&self, remote: Vec<ActivityRecord>) -> Result<()> {
        let mut records = self.inner.records.lock().await;

        let remote_ids: HashSet<String> = remote.iter().map(|r| r.id.clone()).collect();
        let kept: Vec<ActivityRecord> = records
            .iter()
            .filter(|r| !r.is_synced() || !remote_ids.contains(&r.id))
            .cloned()
            .collect();

        let mut merged = remote;
        merged.extend(kept);
        *records = merged;
        self.persist(&records).await
    }

    async fn persist(&self, records: &[ActivityRecord]) -> Result<()> {
        let Some(path) = &self.inner.path else {
            return Ok(());
        };

        let bytes = serde_json::to_vec_pretty(records)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode activity log: {}", e)))?;

        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| AppError::Store(format!("Failed to write {}: {}", path.display(), e)))
    }
}
