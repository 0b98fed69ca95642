// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activities;
pub mod backend;
pub mod catalog;
pub mod sync;

pub use activities::{group_by_category, validate_title, ActivityService, MAX_ACTIVE_ACTIVITIES};
pub use backend::{BackendClient, MutationOutcome, RemoteActivity};
pub use catalog::CategoryCatalog;
pub use sync::SyncCoordinator;
