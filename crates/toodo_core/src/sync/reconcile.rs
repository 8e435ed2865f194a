//! Identity-keyed reconciliation of a posted item list against stored items.
//!
//! # Responsibility
//! - Partition incoming items into inserts and updates.
//! - Collect stored items that the incoming list no longer mentions.
//!
//! # Invariants
//! - Pure: no storage access, no clock access; `now_ms` is injected.
//! - `to_insert` and `to_update` partition `incoming` exactly.
//! - `to_delete` is a subset of `existing`, at most one entry per id.
//! - Match state lives in a per-call side map, never on the items.

use crate::model::toodo::Toodo;
use std::collections::{HashMap, HashSet};

/// Storage operations derived from one reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub to_insert: Vec<Toodo>,
    pub to_update: Vec<Toodo>,
    pub to_delete: Vec<Toodo>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.to_insert.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }

    /// Total number of storage operations the plan will attempt.
    pub fn operation_count(&self) -> usize {
        self.to_insert.len() + self.to_update.len() + self.to_delete.len()
    }
}

/// Computes the insert/update/delete partitions for one sync request.
///
/// An empty `incoming` list is a read, not "delete everything": the returned
/// plan is empty.
///
/// Every incoming item with an unset `created_at` receives `now_ms`.
/// An id repeated in `incoming` is classified against `existing` the first
/// time; later occurrences of an id already planned for insert become updates.
pub fn reconcile(existing: &[Toodo], incoming: &[Toodo], now_ms: i64) -> SyncPlan {
    let mut plan = SyncPlan::default();
    if incoming.is_empty() {
        return plan;
    }

    let mut matched: HashMap<&str, bool> = HashMap::with_capacity(existing.len());
    for item in existing {
        matched.entry(item.id.as_str()).or_insert(false);
    }
    let mut planned_inserts: HashSet<&str> = HashSet::new();

    for item in incoming {
        let mut planned = item.clone();
        planned.fill_created_at(now_ms);

        let id = item.id.as_str();
        if let Some(is_matched) = matched.get_mut(id) {
            *is_matched = true;
            plan.to_update.push(planned);
        } else if planned_inserts.insert(id) {
            plan.to_insert.push(planned);
        } else {
            plan.to_update.push(planned);
        }
    }

    let mut deleted: HashSet<&str> = HashSet::new();
    plan.to_delete = existing
        .iter()
        .filter(|item| !matched.get(item.id.as_str()).copied().unwrap_or(false))
        .filter(|item| deleted.insert(item.id.as_str()))
        .cloned()
        .collect();

    plan
}
