// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Custom-activities sync runner.
//!
//! Wires config → store → backend client → sync coordinator → service,
//! runs one load/sync cycle, and prints the grouped activity listing.

use custom_activities::{
    config::Config,
    services::{ActivityService, BackendClient, CategoryCatalog, SyncCoordinator},
    store::ActivityLog,
    time_utils::format_utc_rfc3339,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(endpoint = %config.api_endpoint, "Starting custom-activities sync");

    let store = ActivityLog::open(&config.store_path)
        .await
        .expect("Failed to open activity log");

    let client = Arc::new(BackendClient::new(
        config.api_endpoint.clone(),
        config.user_id.clone(),
    ));
    let sync = Arc::new(SyncCoordinator::new(client.clone()));

    let mut activities = ActivityService::new(store, sync);
    activities.load().await?;

    let mut catalog = CategoryCatalog::new();
    catalog.refresh(&client).await;
    tracing::info!(areas = catalog.areas().len(), "Category catalog loaded");

    for (category, records) in activities.grouped() {
        println!("{}", category);
        for record in records {
            let name = record.name.as_deref().unwrap_or("");
            match record.date_of_change {
                Some(date) => println!("  {} (synced {})", name, format_utc_rfc3339(date)),
                None => println!("  {} (not synced)", name),
            }
        }
    }

    if activities.is_at_limit() {
        tracing::info!("Active activity limit reached, adding is disabled");
    }

    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("custom_activities=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
