//! Domain model for the todo list.
//!
//! # Invariants
//! - Every item is identified by a caller-assigned `ToodoId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod toodo;
