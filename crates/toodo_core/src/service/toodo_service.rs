//! Toodo use-case service.
//!
//! # Responsibility
//! - Serve the item list and apply posted lists to storage.
//! - Choose between reconcile and append-only sync semantics.
//!
//! # Invariants
//! - Every incoming item is validated before storage is touched.
//! - An empty incoming list never writes; it is answered like a list call.
//! - Plans are applied fail-fast: inserts, then updates, then deletes, each
//!   attempted at most once, without rollback of already applied operations.

use crate::model::toodo::{Toodo, ToodoValidationError};
use crate::repo::toodo_repo::{RepoError, RepoResult, ToodoRepository};
use crate::sync::reconcile::{reconcile, SyncPlan};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// How a non-empty posted list is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// Insert new ids, update known ids, delete ids missing from the post.
    #[default]
    Reconcile,
    /// Insert ids not stored yet; leave everything else untouched.
    Append,
}

impl SyncMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reconcile => "reconcile",
            Self::Append => "append",
        }
    }
}

/// Counts of storage operations performed by one sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub inserted: usize,
    pub updated: usize,
    /// Updates that matched no stored row.
    pub missing_updates: usize,
    pub deleted: usize,
    /// Append mode only: ids already stored.
    pub skipped: usize,
}

/// Service error for sync and list use-cases.
#[derive(Debug)]
pub enum ToodoServiceError {
    /// Caller supplied an invalid item; nothing was written.
    InvalidItem {
        index: usize,
        source: ToodoValidationError,
    },
    /// Persistence-layer failure; earlier operations of the batch stay applied.
    Repo(RepoError),
}

impl Display for ToodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidItem { index, source } => write!(f, "item {index}: {source}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ToodoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidItem { source, .. } => Some(source),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ToodoServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Sync/list facade over a repository implementation.
pub struct ToodoService<R: ToodoRepository> {
    repo: R,
    mode: SyncMode,
}

impl<R: ToodoRepository> ToodoService<R> {
    pub fn new(repo: R, mode: SyncMode) -> Self {
        Self { repo, mode }
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    /// Returns all items, newest first.
    pub fn list(&self) -> RepoResult<Vec<Toodo>> {
        self.repo.select_all()
    }

    /// Applies a posted list and returns the refreshed item list.
    ///
    /// # Errors
    /// - `InvalidItem` when any incoming item fails validation.
    /// - `Repo` when a storage read or write fails; the batch stops there.
    pub fn sync(&self, incoming: Vec<Toodo>) -> Result<Vec<Toodo>, ToodoServiceError> {
        self.sync_at(incoming, crate::now_epoch_ms())
    }

    /// Same as [`ToodoService::sync`] with an explicit "now" for unset
    /// `created_at` values.
    pub fn sync_at(
        &self,
        incoming: Vec<Toodo>,
        now_ms: i64,
    ) -> Result<Vec<Toodo>, ToodoServiceError> {
        for (index, item) in incoming.iter().enumerate() {
            item.validate()
                .map_err(|source| ToodoServiceError::InvalidItem { index, source })?;
        }

        if incoming.is_empty() {
            debug!("event=toodo_sync module=service status=skipped reason=empty_input");
            return Ok(self.list()?);
        }

        let started_at = Instant::now();
        let result = match self.mode {
            SyncMode::Reconcile => self
                .list()
                .map_err(ToodoServiceError::from)
                .and_then(|existing| {
                    let plan = reconcile(&existing, &incoming, now_ms);
                    debug!(
                        "event=toodo_plan module=service status=ok stored={} posted={} operations={}",
                        existing.len(),
                        incoming.len(),
                        plan.operation_count()
                    );
                    self.apply_plan(&plan)
                }),
            SyncMode::Append => self.append(incoming, now_ms),
        };

        match result {
            Ok(stats) => info!(
                "event=toodo_sync module=service status=ok mode={} inserted={} updated={} missing_updates={} deleted={} skipped={} duration_ms={}",
                self.mode.as_str(),
                stats.inserted,
                stats.updated,
                stats.missing_updates,
                stats.deleted,
                stats.skipped,
                started_at.elapsed().as_millis()
            ),
            Err(err) => {
                error!(
                    "event=toodo_sync module=service status=error mode={} duration_ms={} error={}",
                    self.mode.as_str(),
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err);
            }
        }

        Ok(self.list()?)
    }

    /// Executes a plan against the repository, stopping at the first failure.
    pub fn apply_plan(&self, plan: &SyncPlan) -> Result<SyncStats, ToodoServiceError> {
        let mut stats = SyncStats::default();

        for item in &plan.to_insert {
            self.repo.insert(item)?;
            stats.inserted += 1;
        }

        for item in &plan.to_update {
            match self.repo.update(item)? {
                0 => {
                    warn!(
                        "event=toodo_update module=service status=missing id_len={}",
                        item.id.len()
                    );
                    stats.missing_updates += 1;
                }
                _ => stats.updated += 1,
            }
        }

        for item in &plan.to_delete {
            self.repo.delete(&item.id)?;
            stats.deleted += 1;
        }

        Ok(stats)
    }

    fn append(&self, incoming: Vec<Toodo>, now_ms: i64) -> Result<SyncStats, ToodoServiceError> {
        let mut stats = SyncStats::default();

        for mut item in incoming {
            item.fill_created_at(now_ms);
            if self.repo.exists(&item.id)? {
                stats.skipped += 1;
                continue;
            }
            self.repo.insert(&item)?;
            stats.inserted += 1;
        }

        Ok(stats)
    }
}
