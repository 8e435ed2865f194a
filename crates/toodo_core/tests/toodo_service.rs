use std::cell::RefCell;
use toodo_core::db::open_db_in_memory;
use toodo_core::{
    now_epoch_ms, reconcile, RepoError, RepoResult, SqliteToodoRepository, SyncMode, SyncStats,
    Toodo, ToodoRepository, ToodoService, ToodoServiceError, ToodoValidationError,
};

const NOW: i64 = 1_700_000_000_000;

fn dated(id: &str, title: &str, created_at: i64) -> Toodo {
    Toodo {
        created_at,
        ..Toodo::new(id, title)
    }
}

fn ids(items: &[Toodo]) -> Vec<&str> {
    items.iter().map(|item| item.id.as_str()).collect()
}

#[test]
fn reconcile_sync_inserts_updates_and_deletes() {
    let conn = open_db_in_memory().unwrap();
    let service = ToodoService::new(
        SqliteToodoRepository::try_new(&conn).unwrap(),
        SyncMode::Reconcile,
    );
    service
        .sync_at(vec![dated("a", "a", 10), dated("b", "b", 20)], NOW)
        .unwrap();

    let mut renamed = Toodo::new("a", "x");
    renamed.completed = true;
    let refreshed = service
        .sync_at(vec![renamed, Toodo::new("c", "new")], NOW)
        .unwrap();

    assert_eq!(ids(&refreshed), vec!["c", "a"]);
    assert_eq!(refreshed[0].created_at, NOW);
    assert_eq!(refreshed[1].title, "x");
    assert!(refreshed[1].completed);
    assert_eq!(refreshed[1].created_at, 10);
}

#[test]
fn empty_sync_is_a_read_and_keeps_storage() {
    let conn = open_db_in_memory().unwrap();
    let service = ToodoService::new(
        SqliteToodoRepository::try_new(&conn).unwrap(),
        SyncMode::Reconcile,
    );
    service
        .sync_at(vec![dated("a", "a", 10), dated("b", "b", 20)], NOW)
        .unwrap();

    let listed = service.list().unwrap();
    let synced = service.sync(Vec::new()).unwrap();

    assert_eq!(synced, listed);
    assert_eq!(synced.len(), 2);
}

#[test]
fn sync_fills_created_at_with_time_of_call() {
    let conn = open_db_in_memory().unwrap();
    let service = ToodoService::new(
        SqliteToodoRepository::try_new(&conn).unwrap(),
        SyncMode::Reconcile,
    );

    let before = now_epoch_ms();
    let refreshed = service.sync(vec![Toodo::new("a", "undated")]).unwrap();
    let after = now_epoch_ms();

    let created_at = refreshed[0].created_at;
    assert!(created_at > 0);
    assert!(created_at >= before && created_at <= after);
}

#[test]
fn invalid_item_rejects_whole_batch_before_writing() {
    let conn = open_db_in_memory().unwrap();
    let service = ToodoService::new(
        SqliteToodoRepository::try_new(&conn).unwrap(),
        SyncMode::Reconcile,
    );

    let err = service
        .sync_at(vec![Toodo::new("ok", "fine"), Toodo::new(" ", "blank")], NOW)
        .unwrap_err();

    assert!(matches!(
        err,
        ToodoServiceError::InvalidItem {
            index: 1,
            source: ToodoValidationError::EmptyId
        }
    ));
    assert!(service.list().unwrap().is_empty());
}

#[test]
fn append_mode_inserts_only_unknown_ids() {
    let conn = open_db_in_memory().unwrap();
    let service = ToodoService::new(
        SqliteToodoRepository::try_new(&conn).unwrap(),
        SyncMode::Append,
    );
    service.sync_at(vec![dated("a", "original", 10)], NOW).unwrap();

    let refreshed = service
        .sync_at(
            vec![Toodo::new("a", "ignored"), Toodo::new("b", "added")],
            NOW,
        )
        .unwrap();

    assert_eq!(ids(&refreshed), vec!["b", "a"]);
    assert_eq!(refreshed[1].title, "original");
    assert_eq!(service.mode(), SyncMode::Append);
}

#[test]
fn append_mode_never_deletes() {
    let conn = open_db_in_memory().unwrap();
    let service = ToodoService::new(
        SqliteToodoRepository::try_new(&conn).unwrap(),
        SyncMode::Append,
    );
    service
        .sync_at(vec![dated("a", "a", 10), dated("b", "b", 20)], NOW)
        .unwrap();

    let refreshed = service.sync_at(vec![Toodo::new("c", "c")], NOW).unwrap();

    assert_eq!(refreshed.len(), 3);
}

/// In-memory repository that fails the n-th write.
#[derive(Default)]
struct FlakyRepo {
    rows: RefCell<Vec<Toodo>>,
    writes: RefCell<usize>,
    fail_on_write: Option<usize>,
}

impl FlakyRepo {
    fn with_rows(rows: Vec<Toodo>, fail_on_write: Option<usize>) -> Self {
        Self {
            rows: RefCell::new(rows),
            writes: RefCell::new(0),
            fail_on_write,
        }
    }

    fn write(&self) -> RepoResult<()> {
        let mut writes = self.writes.borrow_mut();
        *writes += 1;
        if Some(*writes) == self.fail_on_write {
            return Err(RepoError::InvalidData("injected write failure".to_string()));
        }
        Ok(())
    }
}

impl ToodoRepository for FlakyRepo {
    fn exists(&self, id: &str) -> RepoResult<bool> {
        Ok(self.rows.borrow().iter().any(|row| row.id == id))
    }

    fn select_all(&self) -> RepoResult<Vec<Toodo>> {
        Ok(self.rows.borrow().clone())
    }

    fn insert(&self, item: &Toodo) -> RepoResult<()> {
        self.write()?;
        self.rows.borrow_mut().push(item.clone());
        Ok(())
    }

    fn update(&self, item: &Toodo) -> RepoResult<usize> {
        self.write()?;
        let mut rows = self.rows.borrow_mut();
        let mut changed = 0;
        for row in rows.iter_mut().filter(|row| row.id == item.id) {
            row.title = item.title.clone();
            row.completed = item.completed;
            changed += 1;
        }
        Ok(changed)
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        self.write()?;
        self.rows.borrow_mut().retain(|row| row.id != id);
        Ok(())
    }
}

#[test]
fn failing_write_aborts_remaining_batch_without_rollback() {
    let existing = vec![dated("a", "a", 10), dated("b", "b", 20)];
    let repo = FlakyRepo::with_rows(existing.clone(), Some(2));
    let service = ToodoService::new(repo, SyncMode::Reconcile);

    let incoming = vec![
        Toodo::new("c", "first insert"),
        Toodo::new("d", "second insert fails"),
        Toodo::new("a", "update never attempted"),
    ];
    let err = service.sync_at(incoming, NOW).unwrap_err();
    assert!(matches!(err, ToodoServiceError::Repo(_)));

    let rows = service.list().unwrap();
    assert_eq!(ids(&rows), vec!["a", "b", "c"]);
    assert_eq!(rows[0].title, "a");
}

#[test]
fn apply_plan_counts_operations_and_missing_updates() {
    let existing = vec![dated("a", "a", 10), dated("b", "b", 20)];
    let plan = reconcile(
        &existing,
        &[Toodo::new("a", "renamed"), Toodo::new("c", "new")],
        NOW,
    );
    // Storage lost row `a` after the plan was computed.
    let repo = FlakyRepo::with_rows(vec![dated("b", "b", 20)], None);
    let service = ToodoService::new(repo, SyncMode::Reconcile);

    let stats = service.apply_plan(&plan).unwrap();

    assert_eq!(
        stats,
        SyncStats {
            inserted: 1,
            updated: 0,
            missing_updates: 1,
            deleted: 1,
            skipped: 0,
        }
    );
    assert_eq!(ids(&service.list().unwrap()), vec!["c"]);
}
