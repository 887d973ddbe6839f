//! SeaORM record store for patients; `email` carries a unique index.

use anyhow::Context;
use recordkit::{RecordStore, StoreError};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
};
use uuid::Uuid;

use crate::contract::model::Patient;
use crate::domain::PatientKind;
use crate::infra::storage::entity::{ActiveModel as PatientAM, Column, Entity as PatientEntity};

pub struct SeaOrmPatientsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmPatientsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> RecordStore<PatientKind> for SeaOrmPatientsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn insert(&self, mut patient: Patient) -> Result<Patient, StoreError> {
        patient.id = Uuid::new_v4();
        let (id, email) = (patient.id, patient.email.clone());
        let saved = PatientAM::from(patient)
            .insert(&self.conn)
            .await
            .map_err(|e| StoreError::from_db(e, id, &email, "insert"))?;
        Ok(saved.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Patient>, StoreError> {
        let found = PatientEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Patient>, StoreError> {
        let found = PatientEntity::find()
            .filter(Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("find_by_email failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_all(&self) -> Result<Vec<Patient>, StoreError> {
        let rows = PatientEntity::find()
            .all(&self.conn)
            .await
            .context("find_all failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn exists_by_id(&self, id: Uuid) -> Result<bool, StoreError> {
        let count = PatientEntity::find_by_id(id)
            .count(&self.conn)
            .await
            .context("exists_by_id failed")?;
        Ok(count > 0)
    }

    async fn update(&self, patient: Patient) -> Result<Patient, StoreError> {
        let (id, email) = (patient.id, patient.email.clone());
        let saved = PatientAM::from(patient)
            .update(&self.conn)
            .await
            .map_err(|e| StoreError::from_db(e, id, &email, "update"))?;
        Ok(saved.into())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError> {
        let res = PatientEntity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("delete failed")?;
        Ok(res.rows_affected > 0)
    }
}
