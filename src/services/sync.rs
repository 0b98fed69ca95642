// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sync queue coordinator.
//!
//! Screens register the store they want reconciled; [`SyncCoordinator::start`]
//! drains the queue against the backend. Draining one unit first pushes
//! pending local rows (rows the backend has not acknowledged), then pulls
//! the authoritative activity list and folds it into the store. At most one
//! drain cycle runs at a time: a `start` while one is active returns
//! immediately, and the running drain picks up whatever was enqueued in the
//! meantime.

use crate::models::{ActivityRecord, ChangeKind};
use crate::services::backend::{BackendClient, MutationOutcome};
use crate::store::ActivityLog;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

/// One registered unit of sync work.
struct SyncRequest {
    store: ActivityLog,
}

#[derive(Default)]
struct SyncState {
    queue: VecDeque<SyncRequest>,
    draining: bool,
}

/// Coordinates queued sync work against the backend.
///
/// Construct one per screen or session and share it via `Arc`; there is no
/// ambient instance.
pub struct SyncCoordinator {
    client: Arc<BackendClient>,
    state: Mutex<SyncState>,
    drained_tx: watch::Sender<u64>,
}

impl SyncCoordinator {
    pub fn new(client: Arc<BackendClient>) -> Self {
        let (drained_tx, _) = watch::channel(0);
        Self {
            client,
            state: Mutex::new(SyncState::default()),
            drained_tx,
        }
    }

    /// Register a sync unit for `store`. A unit already queued for the
    /// same store is coalesced away.
    pub async fn enqueue(&self, store: ActivityLog) {
        let mut state = self.state.lock().await;
        if state.queue.iter().any(|unit| unit.store.same_log(&store)) {
            tracing::debug!("Sync already queued for this store, coalescing");
            return;
        }
        state.queue.push_back(SyncRequest { store });
    }

    /// Drain queued units. Returns `true` if this call ran the drain,
    /// `false` if one was already in flight (that drain picks up the
    /// queued work before finishing).
    pub async fn start(&self) -> bool {
        {
            let mut state = self.state.lock().await;
            if state.draining {
                tracing::debug!("Sync drain already in flight, coalescing");
                return false;
            }
            state.draining = true;
        }

        loop {
            let unit = self.state.lock().await.queue.pop_front();
            let Some(unit) = unit else { break };

            self.drain(&unit).await;

            let next = { *self.drained_tx.borrow() } + 1;
            self.drained_tx.send_replace(next);
        }

        self.state.lock().await.draining = false;
        true
    }

    /// Subscribe to drain completions: the value bumps once per drained
    /// unit. Screens holding a grouped view reload on change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.drained_tx.subscribe()
    }

    async fn drain(&self, unit: &SyncRequest) {
        let Some(user_id) = self.client.user_id().map(str::to_string) else {
            tracing::debug!("No authenticated user, skipping sync drain");
            return;
        };

        self.push_pending(&unit.store, &user_id).await;
        self.pull_remote(&unit.store, &user_id).await;
    }

    /// Send every unacknowledged local row to the backend. Rejected and
    /// failed pushes stay pending; the next drain sends them again.
    async fn push_pending(&self, store: &ActivityLog, user_id: &str) {
        let pending: Vec<ActivityRecord> = store
            .all()
            .await
            .into_iter()
            .filter(|record| !record.is_synced())
            .collect();

        for record in pending {
            let outcome = match record.change {
                ChangeKind::Created => self.client.add_custom_activity(&record).await,
                ChangeKind::Updated | ChangeKind::Archived => {
                    self.client.update_custom_activity(&record).await
                }
            };

            match outcome {
                Ok(MutationOutcome::Accepted { .. }) => {
                    if let Err(e) = store.mark_synced(&record.id, user_id, Utc::now()).await {
                        tracing::warn!(error = %e, id = %record.id, "Failed to stamp synced row");
                    }
                }
                Ok(MutationOutcome::Rejected { status, message }) => {
                    tracing::warn!(
                        id = %record.id,
                        status = %status,
                        message = %message,
                        "Backend rejected activity change"
                    );
                }
                Err(e) => {
                    tracing::warn!(error = %e, id = %record.id, "Failed to push activity change");
                }
            }
        }
    }

    /// Pull the authoritative list and fold it into the store. Failures
    /// are logged and the unit still completes; worst case the screen
    /// shows a stale list.
    async fn pull_remote(&self, store: &ActivityLog, user_id: &str) {
        let remote = match self.client.fetch_custom_activities().await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to pull custom activities");
                return;
            }
        };

        let mut records = Vec::with_capacity(remote.len());
        for row in remote {
            match row.into_record(user_id) {
                Some(record) => records.push(record),
                None => tracing::warn!("Dropping remote activity without an id"),
            }
        }

        if let Err(e) = store.merge_remote(records).await {
            tracing::warn!(error = %e, "Failed to merge remote activities");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::backend::RemoteActivity;

    fn pending(id: &str, name: &str, change: ChangeKind) -> ActivityRecord {
        ActivityRecord {
            id: id.to_string(),
            name: Some(name.to_string()),
            old_name: None,
            original_name: Some(name.to_string()),
            category_name: None,
            is_archived: matches!(change, ChangeKind::Archived),
            change,
            date_of_change: None,
            user_id: None,
        }
    }

    fn test_client(user: Option<&str>) -> Arc<BackendClient> {
        Arc::new(BackendClient::new(
            "http://localhost:9/graphql".to_string(),
            user.map(str::to_string),
        ))
    }

    #[tokio::test]
    async fn accepted_push_stamps_sync_metadata() {
        let client = test_client(Some("user-1"));
        client.set_mock_mutation(MutationOutcome::Accepted {
            status: "200".to_string(),
            message: "ok".to_string(),
        });
        client.set_mock_activities(vec![]);

        let store = ActivityLog::in_memory();
        store
            .append(pending("a", "yoga", ChangeKind::Created))
            .await
            .unwrap();

        let sync = SyncCoordinator::new(client.clone());
        sync.enqueue(store.clone()).await;
        assert!(sync.start().await);

        let rows = store.all().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_id.as_deref(), Some("user-1"));
        assert!(rows[0].date_of_change.is_some());
        assert_eq!(client.pushed_names(), vec!["yoga"]);
    }

    #[tokio::test]
    async fn rejected_push_leaves_row_pending() {
        let client = test_client(Some("user-1"));
        client.set_mock_mutation(MutationOutcome::Rejected {
            status: "400".to_string(),
            message: "duplicate name".to_string(),
        });
        client.set_mock_activities(vec![]);

        let store = ActivityLog::in_memory();
        store
            .append(pending("a", "yoga", ChangeKind::Created))
            .await
            .unwrap();

        let sync = SyncCoordinator::new(client);
        sync.enqueue(store.clone()).await;
        sync.start().await;

        assert!(store.all().await[0].user_id.is_none());
    }

    #[tokio::test]
    async fn pull_replaces_synced_rows_and_keeps_pending() {
        let client = test_client(Some("user-1"));
        client.set_mock_mutation(MutationOutcome::Rejected {
            status: "400".to_string(),
            message: "nope".to_string(),
        });
        client.set_mock_activities(vec![RemoteActivity {
            id: Some("r1".to_string()),
            name: Some("stretch".to_string()),
            original_name: Some("stretch".to_string()),
            category_name: Some("Fitness".to_string()),
            is_archived: false,
            last_change_date: None,
        }]);

        let store = ActivityLog::in_memory();
        let mut synced = pending("r1", "old stretch", ChangeKind::Updated);
        synced.user_id = Some("user-1".to_string());
        store.append(synced).await.unwrap();
        store
            .append(pending("p1", "yoga", ChangeKind::Created))
            .await
            .unwrap();

        let sync = SyncCoordinator::new(client);
        sync.enqueue(store.clone()).await;
        sync.start().await;

        let rows = store.all().await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "r1");
        assert_eq!(rows[0].name.as_deref(), Some("stretch"));
        assert_eq!(rows[1].id, "p1");
        assert!(rows[1].user_id.is_none());
    }

    #[tokio::test]
    async fn start_coalesces_reentrant_calls() {
        let sync = SyncCoordinator::new(test_client(Some("user-1")));

        sync.state.lock().await.draining = true;
        assert!(!sync.start().await);

        sync.state.lock().await.draining = false;
        assert!(sync.start().await);
    }

    #[tokio::test]
    async fn enqueue_coalesces_same_store() {
        let sync = SyncCoordinator::new(test_client(None));
        let store = ActivityLog::in_memory();

        sync.enqueue(store.clone()).await;
        sync.enqueue(store.clone()).await;
        assert_eq!(sync.state.lock().await.queue.len(), 1);

        sync.enqueue(ActivityLog::in_memory()).await;
        assert_eq!(sync.state.lock().await.queue.len(), 2);
    }

    #[tokio::test]
    async fn drain_without_user_skips_network() {
        let store = ActivityLog::in_memory();
        store
            .append(pending("a", "yoga", ChangeKind::Created))
            .await
            .unwrap();

        // No mocks: any network call would fail loudly against this port.
        let sync = SyncCoordinator::new(test_client(None));
        sync.enqueue(store.clone()).await;
        assert!(sync.start().await);

        assert!(store.all().await[0].user_id.is_none());
    }

    #[tokio::test]
    async fn drain_completion_bumps_generation() {
        let client = test_client(Some("user-1"));
        client.set_mock_activities(vec![]);

        let sync = SyncCoordinator::new(client);
        let rx = sync.subscribe();
        assert_eq!(*rx.borrow(), 0);

        sync.enqueue(ActivityLog::in_memory()).await;
        sync.start().await;
        assert_eq!(*rx.borrow(), 1);
    }
}
