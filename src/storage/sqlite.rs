//! Transactional SQLite repositories.
//!
//! Each call runs inside its own transaction; existence checks and the
//! write they guard share that transaction, so a rejected create or
//! delete never leaves a partial change behind.

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::database::Database;
use super::model::{MasterRecord, SecretRecord};
use super::{MasterRepository, SecretRepository};
use crate::errors::{MaultError, Result};

/// Master record repository backed by the `master` table.
pub struct SqliteMasterRepository<'db> {
    db: &'db Database,
}

impl<'db> SqliteMasterRepository<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self { db }
    }
}

impl MasterRepository for SqliteMasterRepository<'_> {
    fn create(&self, record: &MasterRecord) -> Result<()> {
        let tx = self
            .db
            .connection()
            .unchecked_transaction()
            .map_err(MaultError::store("initialize mault"))?;

        let exists: bool = tx
            .query_row("SELECT EXISTS(SELECT 1 FROM master)", [], |row| row.get(0))
            .map_err(MaultError::store("initialize mault"))?;
        if exists {
            return Err(MaultError::AlreadyInitialized);
        }

        tx.execute(
            "INSERT INTO master (id, verifier_hash, salt, created_at) VALUES (1, ?1, ?2, ?3)",
            params![record.verifier_hash, record.salt, Utc::now().to_rfc3339()],
        )
        .map_err(MaultError::store("initialize mault"))?;

        tx.commit().map_err(MaultError::store("initialize mault"))
    }

    fn get_first(&self) -> Result<Option<MasterRecord>> {
        self.db
            .connection()
            .query_row(
                "SELECT verifier_hash, salt FROM master ORDER BY id LIMIT 1",
                [],
                |row| {
                    Ok(MasterRecord {
                        verifier_hash: row.get(0)?,
                        salt: row.get(1)?,
                    })
                },
            )
            .optional()
            .map_err(MaultError::store("read master record"))
    }
}

/// Secret repository backed by the `secrets` table.
pub struct SqliteSecretRepository<'db> {
    db: &'db Database,
}

impl<'db> SqliteSecretRepository<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self { db }
    }
}

impl SecretRepository for SqliteSecretRepository<'_> {
    fn create(&self, record: &SecretRecord) -> Result<()> {
        if record.key.is_empty() {
            return Err(MaultError::InvalidSecretKey("key cannot be empty".into()));
        }

        let tx = self
            .db
            .connection()
            .unchecked_transaction()
            .map_err(MaultError::store("create secret"))?;

        let exists: bool = tx
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM secrets WHERE key = ?1)",
                params![record.key],
                |row| row.get(0),
            )
            .map_err(MaultError::store("create secret"))?;
        if exists {
            return Err(MaultError::DuplicateKey(record.key.clone()));
        }

        tx.execute(
            "INSERT INTO secrets (key, nonce, cipher_text, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                record.key,
                record.nonce,
                record.cipher_text,
                Utc::now().to_rfc3339()
            ],
        )
        .map_err(MaultError::store("create secret"))?;

        tx.commit().map_err(MaultError::store("create secret"))
    }

    fn list(&self) -> Result<Vec<String>> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare("SELECT key FROM secrets ORDER BY key")
            .map_err(MaultError::store("list secrets"))?;

        let keys = stmt
            .query_map([], |row| row.get(0))
            .map_err(MaultError::store("list secrets"))?
            .collect::<rusqlite::Result<Vec<String>>>()
            .map_err(MaultError::store("list secrets"))?;

        Ok(keys)
    }

    fn get(&self, key: &str) -> Result<SecretRecord> {
        self.db
            .connection()
            .query_row(
                "SELECT key, nonce, cipher_text FROM secrets WHERE key = ?1",
                params![key],
                |row| {
                    Ok(SecretRecord {
                        key: row.get(0)?,
                        nonce: row.get(1)?,
                        cipher_text: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(MaultError::store("get secret"))?
            .ok_or_else(|| MaultError::SecretNotFound(key.to_string()))
    }

    fn update(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let tx = self
            .db
            .connection()
            .unchecked_transaction()
            .map_err(MaultError::store("delete secret"))?;

        let removed = tx
            .execute("DELETE FROM secrets WHERE key = ?1", params![key])
            .map_err(MaultError::store("delete secret"))?;
        if removed == 0 {
            return Err(MaultError::SecretNotFound(key.to_string()));
        }

        tx.commit().map_err(MaultError::store("delete secret"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: &str, fill: u8) -> SecretRecord {
        SecretRecord {
            key: key.to_string(),
            nonce: vec![fill; 12],
            cipher_text: vec![fill; 20],
        }
    }

    #[test]
    fn master_create_then_get_first() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteMasterRepository::new(&db);
        assert!(repo.get_first().unwrap().is_none());

        let rec = MasterRecord {
            verifier_hash: vec![1; 32],
            salt: vec![2; 16],
        };
        repo.create(&rec).unwrap();
        assert_eq!(repo.get_first().unwrap(), Some(rec));
    }

    #[test]
    fn second_master_record_is_rejected_and_first_kept() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteMasterRepository::new(&db);
        let first = MasterRecord {
            verifier_hash: vec![1; 32],
            salt: vec![2; 16],
        };
        repo.create(&first).unwrap();

        let second = MasterRecord {
            verifier_hash: vec![9; 32],
            salt: vec![9; 16],
        };
        assert!(matches!(
            repo.create(&second),
            Err(MaultError::AlreadyInitialized)
        ));
        assert_eq!(repo.get_first().unwrap(), Some(first));
    }

    #[test]
    fn duplicate_secret_key_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteSecretRepository::new(&db);
        repo.create(&record("db-pass", 1)).unwrap();

        let err = repo.create(&record("db-pass", 2)).unwrap_err();
        assert!(matches!(err, MaultError::DuplicateKey(ref k) if k == "db-pass"));
        assert_eq!(repo.get("db-pass").unwrap(), record("db-pass", 1));
    }

    #[test]
    fn list_is_sorted_and_empty_is_ok() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteSecretRepository::new(&db);
        assert!(repo.list().unwrap().is_empty());

        repo.create(&record("zeta", 1)).unwrap();
        repo.create(&record("alpha", 2)).unwrap();
        assert_eq!(repo.list().unwrap(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn get_and_delete_missing_key_fail_with_not_found() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteSecretRepository::new(&db);
        assert!(matches!(
            repo.get("ghost"),
            Err(MaultError::SecretNotFound(_))
        ));
        assert!(matches!(
            repo.delete("ghost"),
            Err(MaultError::SecretNotFound(_))
        ));
    }

    #[test]
    fn delete_removes_record() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteSecretRepository::new(&db);
        repo.create(&record("api", 1)).unwrap();
        repo.delete("api").unwrap();
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn empty_key_is_rejected_before_insert() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteSecretRepository::new(&db);
        assert!(matches!(
            repo.create(&record("", 1)),
            Err(MaultError::InvalidSecretKey(_))
        ));
    }

    #[test]
    fn update_changes_nothing() {
        let db = Database::open_in_memory().unwrap();
        let repo = SqliteSecretRepository::new(&db);
        repo.create(&record("api", 1)).unwrap();
        repo.update("api").unwrap();
        repo.update("ghost").unwrap();
        assert_eq!(repo.get("api").unwrap(), record("api", 1));
    }
}
