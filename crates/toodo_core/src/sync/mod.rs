//! Sync planning between a posted item list and stored items.

pub mod reconcile;
