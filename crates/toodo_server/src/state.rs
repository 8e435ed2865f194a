//! Shared request state.
//!
//! # Invariants
//! - One SQLite connection per process, guarded by a mutex; storage work of
//!   concurrent requests is serialized.
//! - Storage work runs on the blocking pool, never on an async worker.

use crate::error::ApiError;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::sync::Arc;
use toodo_core::{SqliteToodoRepository, SyncMode, ToodoService};

#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
    mode: SyncMode,
}

impl AppState {
    /// Wraps a connection returned by `toodo_core::db::open_db*`.
    pub fn new(conn: Connection, mode: SyncMode) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            mode,
        }
    }

    /// Runs `op` against a service bound to the shared connection.
    ///
    /// The connection lock is held for the whole of `op`, so a sync's read,
    /// reconcile and writes never interleave with another request.
    pub async fn with_service<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: for<'c> FnOnce(&ToodoService<SqliteToodoRepository<'c>>) -> Result<T, ApiError>
            + Send
            + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let mode = self.mode;

        tokio::task::spawn_blocking(move || -> Result<T, ApiError> {
            let guard = conn.lock();
            let repo = SqliteToodoRepository::try_new(&guard)?;
            op(&ToodoService::new(repo, mode))
        })
        .await
        .map_err(|err| ApiError::Internal(format!("storage task failed: {err}")))?
    }
}
