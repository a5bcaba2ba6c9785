//! Audit log — operation history kept in the vault database.
//!
//! Every mutating command and every failed authentication appends one
//! row to the `audit_log` table.  Writing is fire-and-forget: a failed
//! insert never fails the operation that triggered it.

use chrono::{DateTime, Utc};
use rusqlite::types::ToSql;

use crate::errors::{MaultError, Result};
use crate::storage::Database;

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub key_name: Option<String>,
    pub details: Option<String>,
}

/// Reads and writes the `audit_log` table of an open `Database`.
pub struct AuditLog<'db> {
    db: &'db Database,
}

impl<'db> AuditLog<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self { db }
    }

    /// Record an operation. Errors are reported at debug level and dropped.
    pub fn log(&self, operation: &str, key_name: Option<&str>, details: Option<&str>) {
        let now = Utc::now().to_rfc3339();
        if let Err(e) = self.db.connection().execute(
            "INSERT INTO audit_log (timestamp, operation, key_name, details)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![now, operation, key_name, details],
        ) {
            log::debug!("audit write for '{operation}' failed: {e}");
        }
    }

    /// Query recent audit entries.
    ///
    /// - `limit`: maximum number of entries to return (most recent first).
    /// - `since`: if provided, only return entries at or after this time.
    pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let since_str = since.map(|ts| ts.to_rfc3339());

        let (sql, params): (&str, Vec<&dyn ToSql>) = match since_str {
            Some(ref ts) => (
                "SELECT id, timestamp, operation, key_name, details
                 FROM audit_log
                 WHERE timestamp >= ?1
                 ORDER BY id DESC
                 LIMIT ?2",
                vec![ts as &dyn ToSql, &limit_i64],
            ),
            None => (
                "SELECT id, timestamp, operation, key_name, details
                 FROM audit_log
                 ORDER BY id DESC
                 LIMIT ?1",
                vec![&limit_i64 as &dyn ToSql],
            ),
        };

        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(sql)
            .map_err(MaultError::store("prepare audit query"))?;

        let rows = stmt
            .query_map(params.as_slice(), |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp,
                    operation: row.get(2)?,
                    key_name: row.get(3)?,
                    details: row.get(4)?,
                })
            })
            .map_err(MaultError::store("run audit query"))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(MaultError::store("read audit row"))?);
        }

        Ok(entries)
    }
}
