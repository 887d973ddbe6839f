use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::contract::model::Doctor;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "doctors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
    pub contact_number: String,
    #[sea_orm(unique)]
    pub email: String,
    pub office_address: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Doctor {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            first_name: m.first_name,
            last_name: m.last_name,
            specialty: m.specialty,
            contact_number: m.contact_number,
            email: m.email,
            office_address: m.office_address,
        }
    }
}

impl From<Doctor> for ActiveModel {
    fn from(d: Doctor) -> Self {
        Self {
            id: Set(d.id),
            first_name: Set(d.first_name),
            last_name: Set(d.last_name),
            specialty: Set(d.specialty),
            contact_number: Set(d.contact_number),
            email: Set(d.email),
            office_address: Set(d.office_address),
        }
    }
}
