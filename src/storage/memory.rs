//! In-memory repositories for testing the managers without any I/O.

use std::cell::RefCell;
use std::collections::BTreeMap;

use super::model::{MasterRecord, SecretRecord};
use super::{MasterRepository, SecretRepository};
use crate::errors::{MaultError, Result};

/// A single optional slot standing in for the `master` table.
#[derive(Debug, Default)]
pub struct MemoryMasterRepository {
    slot: RefCell<Option<MasterRecord>>,
}

impl MemoryMasterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start out already holding `record`.
    pub fn with_record(record: MasterRecord) -> Self {
        Self {
            slot: RefCell::new(Some(record)),
        }
    }

    /// A copy of the stored record, if any.
    pub fn record(&self) -> Option<MasterRecord> {
        self.slot.borrow().clone()
    }
}

impl MasterRepository for MemoryMasterRepository {
    fn create(&self, record: &MasterRecord) -> Result<()> {
        let mut slot = self.slot.borrow_mut();
        if slot.is_some() {
            return Err(MaultError::AlreadyInitialized);
        }
        *slot = Some(record.clone());
        Ok(())
    }

    fn get_first(&self) -> Result<Option<MasterRecord>> {
        Ok(self.slot.borrow().clone())
    }
}

/// A key-ordered map standing in for the `secrets` table.
#[derive(Debug, Default)]
pub struct MemorySecretRepository {
    records: RefCell<BTreeMap<String, SecretRecord>>,
}

impl MemorySecretRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    /// Every stored record, ordered by key.
    pub fn snapshot(&self) -> Vec<SecretRecord> {
        self.records.borrow().values().cloned().collect()
    }
}

impl SecretRepository for MemorySecretRepository {
    fn create(&self, record: &SecretRecord) -> Result<()> {
        if record.key.is_empty() {
            return Err(MaultError::InvalidSecretKey("key cannot be empty".into()));
        }

        let mut records = self.records.borrow_mut();
        if records.contains_key(&record.key) {
            return Err(MaultError::DuplicateKey(record.key.clone()));
        }
        records.insert(record.key.clone(), record.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(self.records.borrow().keys().cloned().collect())
    }

    fn get(&self, key: &str) -> Result<SecretRecord> {
        self.records
            .borrow()
            .get(key)
            .cloned()
            .ok_or_else(|| MaultError::SecretNotFound(key.to_string()))
    }

    fn update(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.records
            .borrow_mut()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| MaultError::SecretNotFound(key.to_string()))
    }
}
