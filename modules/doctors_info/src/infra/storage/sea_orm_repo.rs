//! SeaORM-backed record store for doctors.
//!
//! Generic over `C: ConnectionTrait`, so it works with a `DatabaseConnection`
//! or a transaction. The unique index on `email` is the authoritative
//! uniqueness guard; violations come back as `StoreError::DuplicateEmail`.

use anyhow::Context;
use recordkit::{RecordStore, StoreError};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
};
use uuid::Uuid;

use crate::contract::model::Doctor;
use crate::domain::DoctorKind;
use crate::infra::storage::entity::{ActiveModel as DoctorAM, Column, Entity as DoctorEntity};

pub struct SeaOrmDoctorsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmDoctorsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> RecordStore<DoctorKind> for SeaOrmDoctorsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn insert(&self, mut doctor: Doctor) -> Result<Doctor, StoreError> {
        doctor.id = Uuid::new_v4();
        let (id, email) = (doctor.id, doctor.email.clone());
        let saved = DoctorAM::from(doctor)
            .insert(&self.conn)
            .await
            .map_err(|e| StoreError::from_db(e, id, &email, "insert"))?;
        Ok(saved.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Doctor>, StoreError> {
        let found = DoctorEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Doctor>, StoreError> {
        let found = DoctorEntity::find()
            .filter(Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("find_by_email failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_all(&self) -> Result<Vec<Doctor>, StoreError> {
        let rows = DoctorEntity::find()
            .all(&self.conn)
            .await
            .context("find_all failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn exists_by_id(&self, id: Uuid) -> Result<bool, StoreError> {
        let count = DoctorEntity::find_by_id(id)
            .count(&self.conn)
            .await
            .context("exists_by_id failed")?;
        Ok(count > 0)
    }

    async fn update(&self, doctor: Doctor) -> Result<Doctor, StoreError> {
        let (id, email) = (doctor.id, doctor.email.clone());
        let saved = DoctorAM::from(doctor)
            .update(&self.conn)
            .await
            .map_err(|e| StoreError::from_db(e, id, &email, "update"))?;
        Ok(saved.into())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StoreError> {
        let res = DoctorEntity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("delete failed")?;
        Ok(res.rows_affected > 0)
    }
}
