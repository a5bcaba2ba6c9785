//! The SQLite database handle.
//!
//! A `Database` is constructed explicitly by the caller, borrowed by the
//! repositories, and released with `close`.  Opening it also runs the
//! idempotent migration so every table exists before first use.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;

use crate::errors::{MaultError, Result};

/// Schema for every table Mault uses.
///
/// `master.id` is pinned to 1 so a second row can never be inserted.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS master (
    id            INTEGER PRIMARY KEY CHECK (id = 1),
    verifier_hash BLOB NOT NULL,
    salt          BLOB NOT NULL,
    created_at    TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS secrets (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    key         TEXT NOT NULL UNIQUE CHECK (key <> ''),
    nonce       BLOB NOT NULL UNIQUE,
    cipher_text BLOB NOT NULL,
    created_at  TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS audit_log (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp   TEXT NOT NULL,
    operation   TEXT NOT NULL,
    key_name    TEXT,
    details     TEXT
);
";

/// Connection tuning for an on-disk database.
#[derive(Debug, Clone, Copy)]
pub struct DatabaseOptions {
    /// How long a write waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(30),
        }
    }
}

/// An open, migrated Mault database.
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Open (or create) the database file at `path`.
    ///
    /// The parent directory is created if missing.  On Unix the
    /// directory is restricted to 0o700 and the file to 0o600.
    pub fn open(path: &Path, options: &DatabaseOptions) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    std::fs::set_permissions(parent, std::fs::Permissions::from_mode(0o700))?;
                }
            }
        }

        let conn = Connection::open(path).map_err(MaultError::store("open database"))?;
        conn.busy_timeout(options.busy_timeout)
            .map_err(MaultError::store("configure database"))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .map_err(MaultError::store("configure database"))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        let db = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        db.migrate()?;
        log::debug!("opened database at {}", path.display());
        Ok(db)
    }

    /// Open a private in-memory database (used by tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(MaultError::store("open database"))?;
        let db = Self { conn, path: None };
        db.migrate()?;
        Ok(db)
    }

    /// Create any missing tables. Safe to run repeatedly.
    pub fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(SCHEMA)
            .map_err(MaultError::store("migrate database"))
    }

    /// Verify the connection answers a trivial query.
    pub fn health_check(&self) -> Result<()> {
        self.conn
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map(|_| ())
            .map_err(MaultError::store("check database health"))
    }

    /// Path of the database file, or `None` for an in-memory database.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close the connection, surfacing any error SQLite reports.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| MaultError::store("close database")(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table_exists(db: &Database, name: &str) -> bool {
        db.connection()
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
                [name],
                |row| row.get(0),
            )
            .unwrap()
    }

    #[test]
    fn in_memory_database_is_migrated() {
        let db = Database::open_in_memory().unwrap();
        assert!(table_exists(&db, "master"));
        assert!(table_exists(&db, "secrets"));
        assert!(table_exists(&db, "audit_log"));
        assert!(db.path().is_none());
    }

    #[test]
    fn migrate_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db.migrate().unwrap();
        db.health_check().unwrap();
    }

    #[test]
    fn open_creates_parent_directory_and_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("mault.db");

        let db = Database::open(&path, &DatabaseOptions::default()).unwrap();
        assert_eq!(db.path(), Some(path.as_path()));
        db.close().unwrap();

        assert!(path.exists());
    }

    #[test]
    fn reopen_keeps_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mault.db");

        let db = Database::open(&path, &DatabaseOptions::default()).unwrap();
        db.connection()
            .execute(
                "INSERT INTO audit_log (timestamp, operation) VALUES ('t', 'init')",
                [],
            )
            .unwrap();
        db.close().unwrap();

        let db = Database::open(&path, &DatabaseOptions::default()).unwrap();
        let count: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM audit_log", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[cfg(unix)]
    #[test]
    fn database_file_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mault.db");
        let _db = Database::open(&path, &DatabaseOptions::default()).unwrap();

        let perms = std::fs::metadata(&path).unwrap().permissions();
        assert_eq!(perms.mode() & 0o777, 0o600);
    }
}
