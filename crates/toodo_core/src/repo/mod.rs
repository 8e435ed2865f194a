//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage contract used by the sync service.
//! - Isolate SQLite query details from business orchestration.

pub mod toodo_repo;
