//! Core domain logic for Toodo.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod sync;

pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::toodo::{Toodo, ToodoId, ToodoValidationError};
pub use repo::toodo_repo::{RepoError, RepoResult, SqliteToodoRepository, ToodoRepository};
pub use service::toodo_service::{SyncMode, SyncStats, ToodoService, ToodoServiceError};
pub use sync::reconcile::{reconcile, SyncPlan};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Current wall-clock time as Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
