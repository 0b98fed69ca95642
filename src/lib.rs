// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Custom activity tracking with local-first sync.
//!
//! This crate provides the core behind the custom-activity screens of a
//! habit-tracking app: an append-only local change log, a GraphQL backend
//! client, and the reconciliation and sync logic that keeps the two aligned.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod time_utils;
