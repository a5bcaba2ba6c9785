//! Storage module — repository contracts and their backends.
//!
//! The managers in `crate::vault` only see the two traits below.  Two
//! implementations exist for each:
//! - `sqlite`: transactional repositories over an owned `Database`
//! - `memory`: deterministic in-memory fakes for unit tests
//!
//! Both report the same error kinds for the same situations, so a test
//! written against the fake stays valid against SQLite.

pub mod database;
pub mod memory;
pub mod model;
pub mod sqlite;

pub use database::{Database, DatabaseOptions};
pub use memory::{MemoryMasterRepository, MemorySecretRepository};
pub use model::{MasterRecord, SecretRecord};
pub use sqlite::{SqliteMasterRepository, SqliteSecretRepository};

use crate::errors::Result;

/// Persistence for the singleton master record.
pub trait MasterRepository {
    /// Persist `record` as the one master record.
    ///
    /// Fails with `AlreadyInitialized` if a record already exists; the
    /// existing record is left untouched.
    fn create(&self, record: &MasterRecord) -> Result<()>;

    /// Fetch the master record. `Ok(None)` means not initialized.
    fn get_first(&self) -> Result<Option<MasterRecord>>;
}

/// Persistence for named secret records.
pub trait SecretRepository {
    /// Insert `record`. Fails with `DuplicateKey` if the key exists.
    fn create(&self, record: &SecretRecord) -> Result<()>;

    /// All secret keys, sorted ascending.
    fn list(&self) -> Result<Vec<String>>;

    /// Exact-match lookup. Fails with `SecretNotFound`.
    fn get(&self, key: &str) -> Result<SecretRecord>;

    /// Reserved; never mutates anything.
    fn update(&self, key: &str) -> Result<()>;

    /// Remove the record. Fails with `SecretNotFound` if it is absent.
    fn delete(&self, key: &str) -> Result<()>;
}
