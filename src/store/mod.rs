//! Local persistence layer (append-only activity log).

pub mod activity_log;

pub use activity_log::ActivityLog;
