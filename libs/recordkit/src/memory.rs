//! In-memory reference implementation of the store port.
//!
//! Records are kept in insertion order behind a single `RwLock`, and the email
//! uniqueness check runs under the write lock, so concurrent inserts cannot
//! both claim the same address.

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::kind::RecordKind;
use crate::repo::{RecordStore, StoreError};

pub struct InMemoryStore<K: RecordKind> {
    records: RwLock<Vec<K::Record>>,
}

impl<K: RecordKind> InMemoryStore<K> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl<K: RecordKind> Default for InMemoryStore<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<K: RecordKind> RecordStore<K> for InMemoryStore<K> {
    async fn insert(&self, mut record: K::Record) -> Result<K::Record, StoreError> {
        let mut records = self.records.write();
        let email = K::email(&record);
        if records.iter().any(|r| K::email(r) == email) {
            return Err(StoreError::DuplicateEmail {
                email: email.to_string(),
            });
        }
        K::assign_id(&mut record, Uuid::new_v4());
        records.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<K::Record>, StoreError> {
        Ok(self.records.read().iter().find(|r| K::id(r) == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<K::Record>, StoreError> {
        Ok(self
            .records
            .read()
            .iter()
            .find(|r| K::email(r) == email)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<K::Record>, StoreError> {
        Ok(self.records.read().clone())
    }

    async fn exists_by_id(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.records.read().iter().any(|r| K::id(r) == id))
    }

    async fn update(&self, record: K::Record) -> Result<K::Record, StoreError> {
        let mut records = self.records.write();
        let id = K::id(&record);
        let email = K::email(&record);
        if records
            .iter()
            .any(|r| K::id(r) != id && K::email(r) == email)
        {
            return Err(StoreError::DuplicateEmail {
                email: email.to_string(),
            });
        }
        let slot = records
            .iter_mut()
            .find(|r| K::id(r) == id)
            .ok_or(StoreError::Missing { id })?;
        *slot = record.clone();
        Ok(record)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|r| K::id(r) != id);
        Ok(records.len() < before)
    }
}
