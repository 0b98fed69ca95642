// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use custom_activities::models::{ActivityRecord, ChangeKind};
use custom_activities::services::{ActivityService, BackendClient, SyncCoordinator};
use custom_activities::store::ActivityLog;
use std::sync::Arc;

/// Endpoint that is never contacted: tests run with no authenticated user,
/// so the sync drain skips both the push and the pull.
#[allow(dead_code)]
pub const OFFLINE_ENDPOINT: &str = "http://localhost:9/graphql";

/// Build a service over the given log with an offline sync coordinator.
#[allow(dead_code)]
pub fn offline_service(store: ActivityLog) -> ActivityService {
    let client = Arc::new(BackendClient::new(OFFLINE_ENDPOINT.to_string(), None));
    let sync = Arc::new(SyncCoordinator::new(client));
    ActivityService::new(store, sync)
}

/// A fresh unsynced creation row.
#[allow(dead_code)]
pub fn record(id: &str, name: &str) -> ActivityRecord {
    ActivityRecord {
        id: id.to_string(),
        name: Some(name.to_string()),
        old_name: None,
        original_name: Some(name.to_string()),
        category_name: None,
        is_archived: false,
        change: ChangeKind::Created,
        date_of_change: None,
        user_id: None,
    }
}
