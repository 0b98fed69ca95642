// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory category catalog with the picker state for the category
//! selector: at most one area expanded, at most one leaf category chosen.

use crate::models::Area;
use crate::services::backend::BackendClient;

/// Cached category taxonomy plus picker state.
#[derive(Default)]
pub struct CategoryCatalog {
    areas: Vec<Area>,
    expanded_area: Option<usize>,
    selected_category: Option<String>,
}

impl CategoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache wholesale from the backend.
    ///
    /// A transport failure is logged and leaves the cache empty; the
    /// picker simply shows no categories. Expansion resets because it
    /// indexes into the replaced list; the selected category name is kept.
    pub async fn refresh(&mut self, client: &BackendClient) {
        self.areas.clear();
        self.expanded_area = None;

        match client.fetch_areas().await {
            Ok(areas) => self.areas = areas,
            Err(e) => tracing::warn!(error = %e, "Failed to fetch category catalog"),
        }
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    /// Currently expanded area, if any.
    pub fn expanded_area(&self) -> Option<usize> {
        self.expanded_area
    }

    /// Expand one area, collapsing any other; toggling the expanded area
    /// collapses it. Out-of-range indices are ignored.
    pub fn toggle_area(&mut self, index: usize) {
        if index >= self.areas.len() {
            return;
        }
        self.expanded_area = if self.expanded_area == Some(index) {
            None
        } else {
            Some(index)
        };
    }

    /// Collapse every area without touching the selection.
    pub fn collapse_all(&mut self) {
        self.expanded_area = None;
    }

    /// Choose a leaf category. The parent area stays expanded.
    /// Out-of-range indices are ignored.
    pub fn select_category(&mut self, area: usize, category: usize) {
        let Some(name) = self
            .areas
            .get(area)
            .and_then(|a| a.categories.get(category))
            .map(|c| c.name.clone())
        else {
            return;
        };
        self.selected_category = Some(name);
    }

    /// The chosen group name used by submit operations.
    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    pub fn clear_selection(&mut self) {
        self.selected_category = None;
    }

    /// Save is enabled only once a leaf category is chosen.
    pub fn can_save(&self) -> bool {
        self.selected_category.is_some()
    }
}
