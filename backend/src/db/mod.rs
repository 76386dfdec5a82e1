//! SQLite-backed record store for places.
//!
//! Connections are opened per unit of work from a `Database` handle. All store
//! calls are blocking; request handlers go through [`Database::run`], which moves
//! the work onto tokio's blocking pool.

pub mod places;

use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, ErrorCode};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS places (
    id             TEXT PRIMARY KEY,
    place_id       TEXT UNIQUE,
    cid            TEXT,
    title          TEXT NOT NULL,
    address        TEXT NOT NULL,
    category       TEXT NOT NULL,
    governorate    TEXT NOT NULL,
    latitude       REAL NOT NULL,
    longitude      REAL NOT NULL,
    rating         REAL NOT NULL DEFAULT 0,
    reviews        INTEGER NOT NULL DEFAULT 0,
    position       INTEGER NOT NULL DEFAULT 0,
    phone_number   TEXT,
    website        TEXT,
    opening_hours  TEXT,
    price_range    TEXT,
    thumbnail_url  TEXT,
    place_type     TEXT,
    types          TEXT NOT NULL DEFAULT '[]',
    rating_count   INTEGER,
    grid_lat       REAL,
    grid_lng       REAL,
    fid            TEXT,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_places_cid ON places(cid);
CREATE INDEX IF NOT EXISTS idx_places_created_at ON places(created_at);
";

#[derive(Error, Debug)]
pub enum StoreError {
    /// No record matched the key of an update or delete.
    #[error("{0}")]
    NotFound(String),

    /// A uniqueness or NOT NULL constraint rejected the write.
    #[error("{0}")]
    Constraint(String),

    #[error("database error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("background task failed: {0}")]
    Task(String),
}

impl StoreError {
    /// Row-level failures are recorded against the offending import row; every
    /// other failure aborts the batch transaction it happened in.
    pub fn is_row_level(&self) -> bool {
        matches!(self, StoreError::NotFound(_) | StoreError::Constraint(_))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, message)
                if code.code == ErrorCode::ConstraintViolation =>
            {
                StoreError::Constraint(
                    message
                        .clone()
                        .unwrap_or_else(|| "constraint violation".to_string()),
                )
            }
            _ => StoreError::Sqlite(err),
        }
    }
}

/// Handle to the places database file.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Database { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn connect(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        register_functions(&conn)?;
        Ok(conn)
    }

    /// Creates the schema when missing. Safe to call on every start.
    pub fn migrate(&self) -> Result<(), StoreError> {
        let conn = self.connect()?;
        migrate(&conn)
    }

    /// Runs `work` on a fresh connection inside tokio's blocking pool.
    pub async fn run<T, E, F>(&self, work: F) -> Result<T, E>
    where
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, E> + Send + 'static,
    {
        let db = self.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let mut conn = db.connect()?;
            work(&mut conn)
        });

        match handle.await {
            Ok(result) => result,
            Err(join_err) => Err(StoreError::Task(join_err.to_string()).into()),
        }
    }
}

/// `fold_case(text)`: Unicode lowercase. The built-in `lower()` only folds
/// ASCII, so `É` would never match `é` in a search.
pub fn register_functions(conn: &Connection) -> Result<(), StoreError> {
    conn.create_scalar_function(
        "fold_case",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text = ctx.get::<Option<String>>(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )?;
    Ok(())
}

pub fn migrate(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn memory() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory database");
    register_functions(&conn).expect("register functions");
    migrate(&conn).expect("create schema");
    conn
}
