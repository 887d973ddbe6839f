use std::sync::Arc;

use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::error::RecordError;
use crate::kind::RecordKind;
use crate::repo::{RecordStore, StoreError};
use crate::validation::validate;

/// Configuration for the lifecycle manager
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Reject an update that moves the email onto another record's address
    /// before touching the store.
    pub check_email_on_update: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            check_email_on_update: true,
        }
    }
}

/// Entity lifecycle manager: business rules for one record kind.
/// Depends only on the store port, not on infra types.
pub struct Service<K: RecordKind> {
    repo: Arc<dyn RecordStore<K>>,
    config: ServiceConfig,
}

impl<K: RecordKind> Clone for Service<K> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            config: self.config.clone(),
        }
    }
}

impl<K: RecordKind> Service<K> {
    /// Create a service with dependencies.
    pub fn new(repo: Arc<dyn RecordStore<K>>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    #[instrument(name = "records.service.create", skip_all, fields(kind = K::NAME))]
    pub async fn create(&self, new: K::New) -> Result<K::Record, RecordError> {
        info!("Creating record");

        validate(&new).map_err(|errors| RecordError::validation(K::NAME, errors))?;

        let entity = K::to_entity(new);
        let email = K::email(&entity).to_string();
        if self
            .repo
            .find_by_email(&email)
            .await
            .map_err(store_failure)?
            .is_some()
        {
            return Err(RecordError::conflict(K::NAME, email));
        }

        let stored = self.repo.insert(entity).await.map_err(|e| match e {
            StoreError::DuplicateEmail { email } => RecordError::conflict(K::NAME, email),
            other => store_failure(other),
        })?;

        info!(id = %K::id(&stored), "Successfully created record");
        Ok(stored)
    }

    #[instrument(name = "records.service.get", skip(self), fields(kind = K::NAME, record_id = %id))]
    pub async fn get(&self, id: Uuid) -> Result<K::Record, RecordError> {
        debug!("Getting record by id");
        let record = self
            .repo
            .find_by_id(id)
            .await
            .map_err(store_failure)?
            .ok_or_else(|| RecordError::not_found(K::NAME, id))?;
        debug!("Successfully retrieved record");
        Ok(record)
    }

    #[instrument(name = "records.service.list", skip(self), fields(kind = K::NAME))]
    pub async fn list(&self) -> Result<Vec<K::Record>, RecordError> {
        debug!("Listing records");
        let records = self.repo.find_all().await.map_err(store_failure)?;
        debug!("Successfully listed {} records", records.len());
        Ok(records)
    }

    #[instrument(name = "records.service.update", skip(self, patch), fields(kind = K::NAME, record_id = %id))]
    pub async fn update(&self, id: Uuid, patch: K::Patch) -> Result<K::Record, RecordError> {
        info!("Updating record");

        validate(&patch).map_err(|errors| RecordError::validation(K::NAME, errors))?;

        let current = self
            .repo
            .find_by_id(id)
            .await
            .map_err(store_failure)?
            .ok_or_else(|| RecordError::not_found(K::NAME, id))?;

        // Uniqueness for email change
        if self.config.check_email_on_update {
            if let Some(new_email) = K::patch_email(&patch) {
                if new_email != K::email(&current) {
                    let holder = self
                        .repo
                        .find_by_email(new_email)
                        .await
                        .map_err(store_failure)?;
                    if holder.is_some_and(|h| K::id(&h) != id) {
                        return Err(RecordError::conflict(K::NAME, new_email));
                    }
                }
            }
        }

        let merged = K::apply_update(current, patch);
        let saved = self.repo.update(merged).await.map_err(|e| match e {
            StoreError::DuplicateEmail { email } => RecordError::conflict(K::NAME, email),
            StoreError::Missing { id } => RecordError::not_found(K::NAME, id),
            other => store_failure(other),
        })?;

        info!("Successfully updated record");
        Ok(saved)
    }

    #[instrument(name = "records.service.delete", skip(self), fields(kind = K::NAME, record_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<(), RecordError> {
        info!("Deleting record");

        if !self.repo.exists_by_id(id).await.map_err(store_failure)? {
            return Err(RecordError::not_found(K::NAME, id));
        }

        // A concurrent delete between the check and here still means "gone".
        if !self.repo.delete_by_id(id).await.map_err(store_failure)? {
            return Err(RecordError::not_found(K::NAME, id));
        }

        info!("Successfully deleted record");
        Ok(())
    }
}

fn store_failure(e: StoreError) -> RecordError {
    error!(error = %e, "Record store failure");
    RecordError::unexpected(e.to_string())
}
