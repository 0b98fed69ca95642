// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Remote category taxonomy: areas with nested selectable categories.
//!
//! Expansion and selection are picker state and live on
//! [`CategoryCatalog`](crate::services::CategoryCatalog), not on the data.

use serde::Deserialize;

/// Top-level category group from the `areas` query.
#[derive(Debug, Clone, Deserialize)]
pub struct Area {
    pub name: String,
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Selectable leaf group a custom activity is filed under.
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub name: String,
    /// Built-in activity names the backend suggests for this category.
    #[serde(default)]
    pub activities: Vec<SuggestedActivity>,
}

/// A built-in activity suggestion nested under a category.
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestedActivity {
    pub name: String,
}
