// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Domain models.

pub mod activity;
pub mod catalog;

pub use activity::{ActivityRecord, ChangeKind, DEFAULT_CATEGORY};
pub use catalog::{Area, Category, SuggestedActivity};
