// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GraphQL backend client for the custom-activity API.
//!
//! All four operations go to a single endpoint as POST bodies of the form
//! `{"query": "<operation>", "variables": {}}`, with values interpolated
//! into the query text the way the backend expects. Mutations come back as
//! a success/failed union sharing one shape; the union is decoded here into
//! an explicit [`MutationOutcome`] so callers never mistake a rejected
//! mutation for an accepted one.

use crate::error::{AppError, Result};
use crate::models::{ActivityRecord, Area, ChangeKind};
use crate::time_utils::parse_utc_rfc3339;
use serde::Deserialize;

const AREAS_QUERY: &str =
    "query areas {\n  areas {\n    name\n    categories {\n      activities {\n        name\n      }\n      name\n    }\n  }\n}\n";

/// Client for the custom-activity GraphQL endpoint.
pub struct BackendClient {
    http: reqwest::Client,
    endpoint: String,
    user_id: Option<String>,
    /// Mock: canned pull response (test builds only).
    #[cfg(test)]
    mock_activities: std::sync::Mutex<Option<Vec<RemoteActivity>>>,
    /// Mock: canned mutation outcome (test builds only).
    #[cfg(test)]
    mock_mutation: std::sync::Mutex<Option<MutationOutcome>>,
    /// Mock: names pushed through mocked mutations (test builds only).
    #[cfg(test)]
    pushed: std::sync::Mutex<Vec<String>>,
}

impl BackendClient {
    /// Create a client for `endpoint`, acting as `user_id` when present.
    pub fn new(endpoint: String, user_id: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            user_id,
            #[cfg(test)]
            mock_activities: std::sync::Mutex::new(None),
            #[cfg(test)]
            mock_mutation: std::sync::Mutex::new(None),
            #[cfg(test)]
            pushed: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// The authenticated user, if any.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Set a canned response for `fetch_custom_activities` (test builds only).
    #[cfg(test)]
    pub(crate) fn set_mock_activities(&self, rows: Vec<RemoteActivity>) {
        *self.mock_activities.lock().unwrap() = Some(rows);
    }

    /// Set a canned outcome for both mutations (test builds only).
    #[cfg(test)]
    pub(crate) fn set_mock_mutation(&self, outcome: MutationOutcome) {
        *self.mock_mutation.lock().unwrap() = Some(outcome);
    }

    /// Names pushed through mocked mutations, in order (test builds only).
    #[cfg(test)]
    pub(crate) fn pushed_names(&self) -> Vec<String> {
        self.pushed.lock().unwrap().clone()
    }

    /// Fetch the category taxonomy.
    pub async fn fetch_areas(&self) -> Result<Vec<Area>> {
        let data: AreasData = self.post_query(AREAS_QUERY.to_string()).await?;
        Ok(data.areas)
    }

    /// Fetch the user's custom activities.
    ///
    /// Fails locally, without sending anything, when no user is
    /// authenticated.
    pub async fn fetch_custom_activities(&self) -> Result<Vec<RemoteActivity>> {
        let user_id = self.user_id.as_deref().ok_or(AppError::Unauthorized)?;

        #[cfg(test)]
        {
            if let Some(rows) = self.mock_activities.lock().unwrap().clone() {
                return Ok(rows);
            }
        }

        let data: UserData = self.post_query(user_activities_query(user_id)).await?;
        Ok(data.user.map(|u| u.custom_activities).unwrap_or_default())
    }

    /// Create a custom activity on the backend.
    pub async fn add_custom_activity(&self, activity: &ActivityRecord) -> Result<MutationOutcome> {
        #[cfg(test)]
        {
            if let Some(outcome) = self.mock_mutation.lock().unwrap().clone() {
                self.record_push(activity);
                return Ok(outcome);
            }
        }

        let data: AddData = self.post_query(add_activity_query(activity)).await?;
        Ok(data.add_custom_activity.into())
    }

    /// Update (or archive) a custom activity on the backend.
    pub async fn update_custom_activity(
        &self,
        activity: &ActivityRecord,
    ) -> Result<MutationOutcome> {
        #[cfg(test)]
        {
            if let Some(outcome) = self.mock_mutation.lock().unwrap().clone() {
                self.record_push(activity);
                return Ok(outcome);
            }
        }

        let data: UpdateData = self.post_query(update_activity_query(activity)).await?;
        Ok(data.update_custom_activity.into())
    }

    #[cfg(test)]
    fn record_push(&self, activity: &ActivityRecord) {
        self.pushed
            .lock()
            .unwrap()
            .push(activity.name.clone().unwrap_or_default());
    }

    /// POST one operation and unwrap the `data` envelope.
    async fn post_query<T: for<'de> Deserialize<'de>>(&self, query: String) -> Result<T> {
        let body = serde_json::json!({ "query": query, "variables": {} });

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Api(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Api(format!("HTTP {}: {}", status, body)));
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| AppError::Api(format!("JSON parse error: {}", e)))?;

        envelope
            .data
            .ok_or_else(|| AppError::Api("Response carried no data".to_string()))
    }
}

/// The `customActivities` query for one user.
fn user_activities_query(user_id: &str) -> String {
    format!(
        "query MyQuery {{\n  user(userId: \"{}\") {{\n    customActivities {{\n      categoryName\n      id\n      isArchived\n      lastChangeDate\n      name\n      originalName\n    }}\n  }}\n}}\n",
        user_id
    )
}

/// The `addCustomActivity` mutation with its success/failed union.
fn add_activity_query(activity: &ActivityRecord) -> String {
    format!(
        "mutation MyMutation {{\n  addCustomActivity(\n    customActivity: {{\n      name: \"{}\", \n      categoryName: \"{}\", \n      originalName: \"{}\", \n      isArchived: false\n    }}\n  ) {{\n    ... on CreateCustomActivitySuccess {{\n      status\n      success\n      message\n    }}\n    ... on CreateCustomActivityFailed {{\n      status\n      success\n      message\n    }}\n  }}\n}}",
        activity.name.as_deref().unwrap_or(""),
        activity.category_name.as_deref().unwrap_or(""),
        activity.original_name.as_deref().unwrap_or(""),
    )
}

/// The `updateCustomActivity` mutation; also the archive path.
fn update_activity_query(activity: &ActivityRecord) -> String {
    format!(
        "mutation MyMutation {{\n  updateCustomActivity(\n      customActivity: {{\n          oldName: \"{}\", \n          newName: \"{}\", \n          categoryName: \"{}\", \n          originalName: \"{}\", \n          isArchived: {}\n          }}\n          ) {{\n    ... on UpdateCustomActivitySuccess {{\n      status\n      success\n      message\n    }}\n    ... on UpdateCustomActivityFailed {{\n      status\n      success\n      message\n    }}\n  }}\n}}\n",
        activity.old_name.as_deref().unwrap_or(""),
        activity.name.as_deref().unwrap_or(""),
        activity.category_name.as_deref().unwrap_or(""),
        activity.original_name.as_deref().unwrap_or(""),
        activity.is_archived,
    )
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

#[derive(Deserialize)]
struct AreasData {
    areas: Vec<Area>,
}

#[derive(Deserialize)]
struct UserData {
    user: Option<UserNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserNode {
    #[serde(default)]
    custom_activities: Vec<RemoteActivity>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddData {
    add_custom_activity: MutationStatus,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateData {
    update_custom_activity: MutationStatus,
}

/// Raw union payload shared by the success and failed variants; `success`
/// is the discriminator.
#[derive(Debug, Clone, Deserialize)]
pub struct MutationStatus {
    pub status: Option<String>,
    pub success: bool,
    pub message: Option<String>,
}

/// Decoded outcome of a create/update mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Accepted { status: String, message: String },
    Rejected { status: String, message: String },
}

impl From<MutationStatus> for MutationOutcome {
    fn from(raw: MutationStatus) -> Self {
        let status = raw.status.unwrap_or_default();
        let message = raw.message.unwrap_or_default();
        if raw.success {
            MutationOutcome::Accepted { status, message }
        } else {
            MutationOutcome::Rejected { status, message }
        }
    }
}

/// One activity row as selected by the `customActivities` query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteActivity {
    pub id: Option<String>,
    pub name: Option<String>,
    pub original_name: Option<String>,
    pub category_name: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
    pub last_change_date: Option<String>,
}

impl RemoteActivity {
    /// Convert into a change-log row owned by `user_id`.
    ///
    /// Returns `None` for rows the backend sent without an id; they cannot
    /// participate in per-activity reconciliation.
    pub fn into_record(self, user_id: &str) -> Option<ActivityRecord> {
        let id = self.id?;
        let change = if self.is_archived {
            ChangeKind::Archived
        } else {
            ChangeKind::Updated
        };

        Some(ActivityRecord {
            id,
            name: self.name,
            old_name: None,
            original_name: self.original_name,
            category_name: self.category_name,
            is_archived: self.is_archived,
            change,
            date_of_change: self.last_change_date.as_deref().and_then(parse_utc_rfc3339),
            user_id: Some(user_id.to_string()),
        })
    }
}
