//! Database module for the persistent catalog.
//!
//! Uses rusqlite (SQLite) with a thread-safe `Database` handle.
//! All access is serialized through a `Mutex<Connection>`.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

pub mod document_repo;
pub mod error;
pub mod migrations;

pub use document_repo::{DocumentRow, NewDocument};
pub use error::DatabaseError;

/// File name of the catalog inside the storage root.
pub const CATALOG_FILE_NAME: &str = "DOPI.db";

/// Name of the SQL function used for case-insensitive matching.
pub(crate) const FOLD_FUNCTION: &str = "dopi_fold";

/// Thread-safe database handle wrapping a single rusqlite connection.
///
/// Cloning is cheap (inner `Arc`). All access is serialized through
/// a `Mutex`, which is fine for SQLite (which serializes writes anyway).
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens (or creates) the database at the given path and runs all
    /// pending migrations.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| DatabaseError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        prepare(&conn)?;

        log::info!("Catalog opened at {}", path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens an in-memory database for testing. Runs all migrations.
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        prepare(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Provides locked access to the underlying connection.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&Connection) -> Result<T, DatabaseError>,
    {
        let conn = self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        f(&conn)
    }
}

/// Case-folds one char. Lowercasing alone leaves the final sigma `ς`
/// distinct from `σ`, so it is mapped as well.
pub(crate) fn fold_char(c: char) -> impl Iterator<Item = char> {
    c.to_lowercase().map(|l| if l == 'ς' { 'σ' } else { l })
}

/// Case-folds char by char, independent of surrounding context.
pub(crate) fn fold(text: &str) -> String {
    text.chars().flat_map(fold_char).collect()
}

fn prepare(conn: &Connection) -> Result<(), DatabaseError> {
    register_fold(conn)?;
    migrations::run_all(conn)
}

/// Registers `dopi_fold(text)`, a Unicode-aware lowercase used for
/// case-insensitive substring search. SQLite's own `lower()` only folds ASCII.
fn register_fold(conn: &Connection) -> Result<(), DatabaseError> {
    conn.create_scalar_function(
        FOLD_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|v| fold(&v)))
        },
    )?;
    Ok(())
}

/// Returns the catalog path for a storage root: `<root>/DOPI.db`.
pub fn catalog_path(storage_root: &Path) -> PathBuf {
    storage_root.join(CATALOG_FILE_NAME)
}

/// True for the catalog file and the sidecar files SQLite keeps next to it.
pub fn is_catalog_file(name: &str) -> bool {
    name == CATALOG_FILE_NAME
        || ["-wal", "-shm", "-journal"]
            .iter()
            .any(|suffix| name.strip_suffix(suffix) == Some(CATALOG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let count: u32 =
                conn.query_row("SELECT COUNT(*) FROM _migrations", [], |r| r.get(0))?;
            assert!(count > 0);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_open_file_db() {
        let dir = tempfile::tempdir().unwrap();
        let path = catalog_path(dir.path());
        Database::open(&path).unwrap();
        assert!(path.exists());
        assert!(path.ends_with(CATALOG_FILE_NAME));
    }

    #[test]
    fn test_reopen_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = catalog_path(dir.path());
        {
            let db = Database::open(&path).unwrap();
            db.with_conn(|conn| {
                conn.execute("INSERT INTO documents (name, content) VALUES ('a.pdf', 'x')", [])?;
                Ok(())
            })
            .unwrap();
        }

        let db = Database::open(&path).unwrap();
        let count: u32 = db
            .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM documents", [], |r| r.get(0))?))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_fold_function_is_unicode_aware() {
        let db = Database::open_in_memory().unwrap();
        let folded: String = db
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT dopi_fold('ÄRGER Über')", [], |r| r.get(0))?)
            })
            .unwrap();
        assert_eq!(folded, "ärger über");
    }

    #[test]
    fn test_fold_final_sigma() {
        assert_eq!(fold("ΛΌΓΟΣ"), "λόγοσ");
        assert_eq!(fold("λόγος"), "λόγοσ");
        assert_eq!(fold("Σ"), fold("ς"));
    }

    #[test]
    fn test_fold_function_passes_null_through() {
        let db = Database::open_in_memory().unwrap();
        let folded: Option<String> = db
            .with_conn(|conn| Ok(conn.query_row("SELECT dopi_fold(NULL)", [], |r| r.get(0))?))
            .unwrap();
        assert!(folded.is_none());
    }

    #[test]
    fn test_is_catalog_file() {
        assert!(is_catalog_file("DOPI.db"));
        assert!(is_catalog_file("DOPI.db-wal"));
        assert!(is_catalog_file("DOPI.db-shm"));
        assert!(is_catalog_file("DOPI.db-journal"));
        assert!(!is_catalog_file("invoice.pdf"));
        assert!(!is_catalog_file("DOPI.db.bak"));
    }

    #[test]
    fn test_database_is_clone() {
        let db = Database::open_in_memory().unwrap();
        let db2 = db.clone();
        db.with_conn(|conn| {
            conn.execute("INSERT INTO documents (name) VALUES ('shared.pdf')", [])?;
            Ok(())
        })
        .unwrap();
        db2.with_conn(|conn| {
            let count: u32 = conn.query_row("SELECT COUNT(*) FROM documents", [], |r| r.get(0))?;
            assert_eq!(count, 1);
            Ok(())
        })
        .unwrap();
    }
}
