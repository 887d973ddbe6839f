use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::kind::RecordKind;

/// Failures reported by a [`RecordStore`].
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store's unique email constraint rejected the write.
    #[error("email '{email}' is already taken")]
    DuplicateEmail { email: String },

    /// The record addressed by an update no longer exists.
    #[error("record {id} does not exist")]
    Missing { id: Uuid },

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    /// Classify a SeaORM write failure for the record `id` carrying `email`.
    pub fn from_db(err: sea_orm::DbErr, id: Uuid, email: &str, op: &'static str) -> Self {
        if let Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
            return Self::DuplicateEmail {
                email: email.to_string(),
            };
        }
        match err {
            sea_orm::DbErr::RecordNotUpdated => Self::Missing { id },
            other => Self::Backend(anyhow::Error::new(other).context(format!("{op} failed"))),
        }
    }
}

/// Port for the domain layer: persistence operations the lifecycle manager needs.
/// Object-safe and async-friendly via `async_trait`.
///
/// Implementations own identifier assignment and must enforce email
/// uniqueness themselves (unique index, write lock, ...); the service-level
/// email lookup is only the friendly error path.
#[async_trait]
pub trait RecordStore<K: RecordKind>: Send + Sync {
    /// Persist a new record, assigning a fresh identifier. Returns the stored record.
    async fn insert(&self, record: K::Record) -> Result<K::Record, StoreError>;

    /// Load a record by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<K::Record>, StoreError>;

    /// Secondary lookup by exact email.
    async fn find_by_email(&self, email: &str) -> Result<Option<K::Record>, StoreError>;

    /// Full scan in store iteration order.
    async fn find_all(&self) -> Result<Vec<K::Record>, StoreError>;

    async fn exists_by_id(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Overwrite an existing record by primary key.
    async fn update(&self, record: K::Record) -> Result<K::Record, StoreError>;

    /// Delete by id. Returns true if a record was removed.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError>;
}
