// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity reconciliation service.
//!
//! Rebuilds the active, grouped view of the local change log and appends
//! new change rows for create / rename / archive submissions. Holds the
//! view state for one screen: the active list (names descending) and the
//! category grouping (keys ascending).

use crate::error::{Result, ValidationError};
use crate::models::{ActivityRecord, ChangeKind};
use crate::services::sync::SyncCoordinator;
use crate::store::ActivityLog;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use uuid::Uuid;

/// Maximum number of active custom activities a user may have. The add
/// affordance is disabled at the limit; submissions themselves are not
/// capped here.
pub const MAX_ACTIVE_ACTIVITIES: usize = 10;

/// Maximum title length, in characters.
const MAX_TITLE_CHARS: usize = 40;

/// Validate and normalize a candidate activity title: surrounding
/// whitespace trimmed, result lower-cased.
pub fn validate_title(raw: &str) -> std::result::Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if trimmed.chars().count() > MAX_TITLE_CHARS {
        return Err(ValidationError::TooLong);
    }
    Ok(trimmed.to_lowercase())
}

/// Group records by category for display, bucketing uncategorized records
/// under "Default". `BTreeMap` iteration gives the ascending key order the
/// list screen renders in.
pub fn group_by_category(records: &[ActivityRecord]) -> BTreeMap<String, Vec<ActivityRecord>> {
    let mut grouped: BTreeMap<String, Vec<ActivityRecord>> = BTreeMap::new();
    for record in records {
        grouped
            .entry(record.category_or_default().to_string())
            .or_default()
            .push(record.clone());
    }
    grouped
}

/// Reduce the full change log to the newest row per logical activity.
/// The log is in append order, so the last row wins.
fn latest_per_activity(records: Vec<ActivityRecord>) -> Vec<ActivityRecord> {
    let mut latest: Vec<ActivityRecord> = Vec::new();
    let mut by_id: HashMap<String, usize> = HashMap::new();

    for record in records {
        match by_id.get(&record.id) {
            Some(&slot) => latest[slot] = record,
            None => {
                by_id.insert(record.id.clone(), latest.len());
                latest.push(record);
            }
        }
    }
    latest
}

/// Per-screen service over the local log and the sync coordinator.
pub struct ActivityService {
    store: ActivityLog,
    sync: Arc<SyncCoordinator>,
    active: Vec<ActivityRecord>,
    grouped: BTreeMap<String, Vec<ActivityRecord>>,
}

impl ActivityService {
    pub fn new(store: ActivityLog, sync: Arc<SyncCoordinator>) -> Self {
        Self {
            store,
            sync,
            active: Vec::new(),
            grouped: BTreeMap::new(),
        }
    }

    /// Active records, names descending.
    pub fn active(&self) -> &[ActivityRecord] {
        &self.active
    }

    /// Active records grouped by category, keys ascending.
    pub fn grouped(&self) -> &BTreeMap<String, Vec<ActivityRecord>> {
        &self.grouped
    }

    /// Whether the add affordance should be disabled.
    pub fn is_at_limit(&self) -> bool {
        self.active.len() >= MAX_ACTIVE_ACTIVITIES
    }

    /// Reload the view from the store and run a sync cycle, reloading
    /// again if a drain completed.
    pub async fn load(&mut self) -> Result<()> {
        self.reload_from_store().await;
        self.sync.enqueue(self.store.clone()).await;
        if self.sync.start().await {
            self.reload_from_store().await;
        }
        Ok(())
    }

    /// Rebuild the active list and grouping from the store: newest row per
    /// activity, archived and nameless rows dropped, names descending.
    pub async fn reload_from_store(&mut self) {
        let mut records: Vec<ActivityRecord> = latest_per_activity(self.store.all().await)
            .into_iter()
            .filter(|record| !record.is_archived && record.name.is_some())
            .collect();
        records.sort_by(|a, b| b.name.cmp(&a.name));

        self.grouped = group_by_category(&records);
        self.active = records;
    }

    /// Validate and append a creation row, then reload and sync.
    pub async fn submit_create(&mut self, title: &str, category_name: Option<&str>) -> Result<()> {
        let name = validate_title(title)?;

        let record = ActivityRecord {
            id: Uuid::new_v4().to_string(),
            name: Some(name.clone()),
            old_name: None,
            original_name: Some(name),
            category_name: category_name.map(str::to_string),
            is_archived: false,
            change: ChangeKind::Created,
            date_of_change: None,
            user_id: None,
        };

        self.store.append(record).await?;
        self.load().await
    }

    /// Validate and append a rename/recategorize row, then reload and sync.
    pub async fn submit_update(
        &mut self,
        id: &str,
        title: &str,
        category_name: Option<&str>,
        old_name: Option<&str>,
        original_name: Option<&str>,
    ) -> Result<()> {
        let name = validate_title(title)?;
        self.append_change(id, name, category_name, old_name, original_name, ChangeKind::Updated)
            .await
    }

    /// Validate and append an archive row. Prior rows stay in the log.
    pub async fn submit_archive(
        &mut self,
        id: &str,
        title: &str,
        category_name: Option<&str>,
        old_name: Option<&str>,
        original_name: Option<&str>,
    ) -> Result<()> {
        let name = validate_title(title)?;
        self.append_change(id, name, category_name, old_name, original_name, ChangeKind::Archived)
            .await
    }

    async fn append_change(
        &mut self,
        id: &str,
        name: String,
        category_name: Option<&str>,
        old_name: Option<&str>,
        original_name: Option<&str>,
        change: ChangeKind,
    ) -> Result<()> {
        let record = ActivityRecord {
            id: id.to_string(),
            name: Some(name),
            old_name: old_name.map(str::to_string),
            original_name: original_name.map(str::to_string),
            category_name: category_name.map(str::to_string),
            is_archived: matches!(change, ChangeKind::Archived),
            change,
            date_of_change: None,
            user_id: None,
        };

        self.store.append(record).await?;
        self.load().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: Option<&str>, category: Option<&str>, archived: bool) -> ActivityRecord {
        ActivityRecord {
            id: id.to_string(),
            name: name.map(str::to_string),
            old_name: None,
            original_name: name.map(str::to_string),
            category_name: category.map(str::to_string),
            is_archived: archived,
            change: if archived {
                ChangeKind::Archived
            } else {
                ChangeKind::Created
            },
            date_of_change: None,
            user_id: None,
        }
    }

    #[test]
    fn validate_rejects_empty_titles() {
        assert_eq!(validate_title(""), Err(ValidationError::EmptyName));
        assert_eq!(validate_title("   "), Err(ValidationError::EmptyName));
    }

    #[test]
    fn validate_rejects_titles_over_40_chars() {
        let long = "a".repeat(41);
        assert_eq!(validate_title(&long), Err(ValidationError::TooLong));

        let exactly_40 = "a".repeat(40);
        assert_eq!(validate_title(&exactly_40), Ok(exactly_40));
    }

    #[test]
    fn validate_counts_chars_not_bytes() {
        let title = "ö".repeat(40);
        assert_eq!(validate_title(&title), Ok(title.clone()));
        assert_eq!(validate_title(&"ö".repeat(41)), Err(ValidationError::TooLong));
    }

    #[test]
    fn validate_trims_then_lowercases() {
        assert_eq!(validate_title("  Yoga  "), Ok("yoga".to_string()));
        // trailing whitespace does not count against the limit
        let padded = format!("  {}  ", "a".repeat(40));
        assert_eq!(validate_title(&padded), Ok("a".repeat(40)));
    }

    #[test]
    fn grouping_buckets_uncategorized_under_default() {
        let records = vec![
            record("a", Some("run"), Some("Fitness"), false),
            record("b", Some("cook"), None, false),
        ];

        let grouped = group_by_category(&records);
        assert_eq!(grouped["Fitness"].len(), 1);
        assert_eq!(grouped["Default"].len(), 1);
    }

    #[test]
    fn grouping_keys_iterate_ascending() {
        let records = vec![
            record("a", Some("run"), Some("Fitness"), false),
            record("b", Some("read"), Some("Mind"), false),
            record("c", Some("cook"), Some("Cooking"), false),
        ];

        let grouped = group_by_category(&records);
        let keys: Vec<&String> = grouped.keys().collect();
        assert_eq!(keys, vec!["Cooking", "Fitness", "Mind"]);
    }

    #[test]
    fn grouping_is_idempotent() {
        let records = vec![
            record("a", Some("run"), Some("Fitness"), false),
            record("b", Some("read"), Some("Mind"), false),
            record("c", Some("cook"), None, false),
        ];

        let grouped = group_by_category(&records);
        let flattened: Vec<ActivityRecord> =
            grouped.values().flat_map(|group| group.clone()).collect();
        let regrouped = group_by_category(&flattened);

        assert_eq!(grouped.keys().collect::<Vec<_>>(), regrouped.keys().collect::<Vec<_>>());
        for key in grouped.keys() {
            let names = |groups: &BTreeMap<String, Vec<ActivityRecord>>| {
                groups[key]
                    .iter()
                    .map(|r| r.name.clone())
                    .collect::<Vec<_>>()
            };
            assert_eq!(names(&grouped), names(&regrouped));
        }
    }

    #[test]
    fn latest_row_per_activity_wins() {
        let rows = vec![
            record("a", Some("jogging"), Some("Fitness"), false),
            record("b", Some("read"), Some("Mind"), false),
            record("a", Some("trail running"), Some("Fitness"), false),
        ];

        let latest = latest_per_activity(rows);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].name.as_deref(), Some("trail running"));
        assert_eq!(latest[1].name.as_deref(), Some("read"));
    }

    #[test]
    fn archive_row_hides_the_older_active_row() {
        let rows = vec![
            record("a", Some("run"), Some("Fitness"), false),
            record("a", Some("run"), Some("Fitness"), true),
        ];

        let active: Vec<ActivityRecord> = latest_per_activity(rows)
            .into_iter()
            .filter(|r| !r.is_archived && r.name.is_some())
            .collect();
        assert!(active.is_empty());
    }
}
