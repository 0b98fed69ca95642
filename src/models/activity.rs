// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Custom activity change-log records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Grouping bucket for records without a category.
pub const DEFAULT_CATEGORY: &str = "Default";

/// What a change-log row records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Updated,
    Archived,
}

/// One row of the local activity change log.
///
/// The log is append-only: every create, rename, or archive adds a new row
/// carrying the same logical activity `id`. The newest row per `id` is the
/// current state; older rows stay so history referencing earlier names
/// remains resolvable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Stable identifier of the logical activity across edits
    pub id: String,
    /// Current display name (lower-cased, at most 40 characters)
    pub name: Option<String>,
    /// Name immediately before this edit; `None` on a creation row
    pub old_name: Option<String>,
    /// Name at creation time, preserved across renames so past journal
    /// entries keep pointing at something
    pub original_name: Option<String>,
    /// Category the activity is filed under; `None` lands in "Default"
    pub category_name: Option<String>,
    /// Archived rows are hidden from active listings but never deleted
    pub is_archived: bool,
    /// Kind of change this row records. Archive rows carry both
    /// `ChangeKind::Archived` and `is_archived = true`.
    pub change: ChangeKind,
    /// When the change was recorded; `None` until the row has synced
    pub date_of_change: Option<DateTime<Utc>>,
    /// Owner on the backend; `None` for locally-created unsynced rows
    pub user_id: Option<String>,
}

impl ActivityRecord {
    /// Whether the backend has acknowledged this row.
    pub fn is_synced(&self) -> bool {
        self.user_id.is_some()
    }

    /// Grouping key for display: the category, or the default bucket.
    pub fn category_or_default(&self) -> &str {
        self.category_name.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }
}
