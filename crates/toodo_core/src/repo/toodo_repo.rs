//! Toodo repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the storage operations sync is built from: `exists`,
//!   `select_all`, `insert`, `update`, `delete`.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Toodo::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `update` never touches `created_at`.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::toodo::{Toodo, ToodoValidationError};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TOODO_TABLE: &str = "toodo";
const REQUIRED_COLUMNS: &[&str] = &["id", "title", "completed", "created_at"];

const TOODO_SELECT_ALL_SQL: &str = "SELECT id, title, completed, created_at
FROM toodo
ORDER BY created_at DESC, id ASC";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for item persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ToodoValidationError),
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted toodo data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ToodoValidationError> for RepoError {
    fn from(value: ToodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract for todo items.
pub trait ToodoRepository {
    fn exists(&self, id: &str) -> RepoResult<bool>;
    /// All items ordered by `created_at DESC, id ASC`.
    fn select_all(&self) -> RepoResult<Vec<Toodo>>;
    fn insert(&self, item: &Toodo) -> RepoResult<()>;
    /// Rewrites `title` and `completed`; returns the number of rows affected.
    fn update(&self, item: &Toodo) -> RepoResult<usize>;
    fn delete(&self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed toodo repository.
pub struct SqliteToodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteToodoRepository<'conn> {
    /// Wraps a connection after checking it went through `open_db`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `user_version` is not the latest.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   was tampered with.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version = current_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let columns = table_columns(conn, TOODO_TABLE)?;
        if columns.is_empty() {
            return Err(RepoError::MissingRequiredTable(TOODO_TABLE));
        }
        let missing = REQUIRED_COLUMNS
            .iter()
            .copied()
            .find(|required| !columns.iter().any(|column| column.as_str() == *required));
        if let Some(column) = missing {
            return Err(RepoError::MissingRequiredColumn {
                table: TOODO_TABLE,
                column,
            });
        }

        Ok(Self { conn })
    }
}

impl ToodoRepository for SqliteToodoRepository<'_> {
    fn exists(&self, id: &str) -> RepoResult<bool> {
        let found = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM toodo WHERE id = ?1);",
            [id],
            |row| row.get::<_, bool>(0),
        )?;
        Ok(found)
    }

    fn select_all(&self) -> RepoResult<Vec<Toodo>> {
        let mut stmt = self.conn.prepare(TOODO_SELECT_ALL_SQL)?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(parse_toodo_row(row)?);
        }

        Ok(items)
    }

    fn insert(&self, item: &Toodo) -> RepoResult<()> {
        item.validate()?;

        self.conn.execute(
            "INSERT INTO toodo (id, title, completed, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                item.id.as_str(),
                item.title.as_str(),
                item.completed,
                item.created_at,
            ],
        )?;
        Ok(())
    }

    fn update(&self, item: &Toodo) -> RepoResult<usize> {
        item.validate()?;

        let changed = self.conn.execute(
            "UPDATE toodo SET title = ?1, completed = ?2 WHERE id = ?3;",
            params![item.title.as_str(), item.completed, item.id.as_str()],
        )?;
        Ok(changed)
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        self.conn.execute("DELETE FROM toodo WHERE id = ?1;", [id])?;
        Ok(())
    }
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

fn parse_toodo_row(row: &Row<'_>) -> RepoResult<Toodo> {
    let id: String = row.get("id")?;
    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` for toodo `{id}`"
            )));
        }
    };

    let item = Toodo {
        id,
        title: row.get("title")?,
        completed,
        created_at: row.get("created_at")?,
    };
    item.validate()?;
    Ok(item)
}
