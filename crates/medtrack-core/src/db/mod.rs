//! Database layer for medtrack.
//!
//! Lookups return `Option`/`Vec` for absent rows; errors are reserved for
//! failures of the store itself.

mod intakes;
mod medications;
mod patients;
mod posologies;
mod schema;

pub use schema::*;

use rusqlite::{Connection, ErrorCode};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// How long a session waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Whether an error is an integrity violation (unique, foreign key, check).
pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

/// Map integrity violations to `DbError::Constraint`, everything else to `Sqlite`.
pub(crate) fn classify(err: rusqlite::Error) -> DbError {
    if is_constraint_violation(&err) {
        DbError::Constraint(err.to_string())
    } else {
        DbError::Sqlite(err)
    }
}

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating the schema if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let db = Self::connect(path)?;
        db.initialize()?;
        Ok(db)
    }

    /// Open a session on an existing database without touching the schema.
    pub fn connect<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(CONNECTION_PRAGMAS)?;
        Ok(Self { conn })
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Shareable handle to the on-disk store.
///
/// Holds no connection itself: every [`Store::session`] opens one, and the
/// connection closes when the returned [`Database`] is dropped.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Create the schema at `path` and return a handle to it.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref().to_path_buf();
        Database::open(&path)?;
        tracing::debug!(path = %path.display(), "store initialized");
        Ok(Self { path })
    }

    /// Acquire a scoped session for one unit of work.
    pub fn session(&self) -> DbResult<Database> {
        Database::connect(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_schema_initialized() {
        let db = Database::open_in_memory().unwrap();

        // Check that tables exist
        let tables: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"patients".to_string()));
        assert!(tables.contains(&"medications".to_string()));
        assert!(tables.contains(&"posologies".to_string()));
        assert!(tables.contains(&"intakes".to_string()));
    }

    #[test]
    fn test_sessions_enforce_foreign_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("store.db")).unwrap();

        let session = store.session().unwrap();
        let enabled: i64 = session
            .conn()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_sessions_share_data() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("store.db")).unwrap();

        {
            let session = store.session().unwrap();
            session
                .conn()
                .execute("INSERT INTO patients (username) VALUES ('u1')", [])
                .unwrap();
        }

        let session = store.session().unwrap();
        let count: i64 = session
            .conn()
            .query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_classify_constraint() {
        let db = Database::open_in_memory().unwrap();
        db.conn()
            .execute("INSERT INTO patients (username) VALUES ('u1')", [])
            .unwrap();
        let err = db
            .conn()
            .execute("INSERT INTO patients (username) VALUES ('u1')", [])
            .unwrap_err();
        assert!(matches!(classify(err), DbError::Constraint(_)));
    }
}
