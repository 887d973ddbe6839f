use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::contract::model::Patient;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "patients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<Date>,
    pub gender: String,
    pub contact_number: String,
    #[sea_orm(unique)]
    pub email: String,
    pub address: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Patient {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            first_name: m.first_name,
            last_name: m.last_name,
            date_of_birth: m.date_of_birth,
            gender: m.gender,
            contact_number: m.contact_number,
            email: m.email,
            address: m.address,
        }
    }
}

impl From<Patient> for ActiveModel {
    fn from(p: Patient) -> Self {
        Self {
            id: Set(p.id),
            first_name: Set(p.first_name),
            last_name: Set(p.last_name),
            date_of_birth: Set(p.date_of_birth),
            gender: Set(p.gender),
            contact_number: Set(p.contact_number),
            email: Set(p.email),
            address: Set(p.address),
        }
    }
}
