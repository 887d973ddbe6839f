use chrono::NaiveDate;
use recordkit::{null_as_empty, RestKind};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::model::{NewPatient, Patient, PatientPatch};
use crate::domain::PatientKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub contact_number: String,
    pub email: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePatientReq {
    #[serde(deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub last_name: String,
    /// ISO-8601 calendar date (`YYYY-MM-DD`).
    pub date_of_birth: Option<NaiveDate>,
    #[serde(deserialize_with = "null_as_empty")]
    pub gender: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub contact_number: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub address: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientReq {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl From<Patient> for PatientDto {
    fn from(p: Patient) -> Self {
        Self {
            id: p.id,
            first_name: p.first_name,
            last_name: p.last_name,
            date_of_birth: p.date_of_birth,
            gender: p.gender,
            contact_number: p.contact_number,
            email: p.email,
            address: p.address,
        }
    }
}

impl From<CreatePatientReq> for NewPatient {
    fn from(req: CreatePatientReq) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            date_of_birth: req.date_of_birth,
            gender: req.gender,
            contact_number: req.contact_number,
            email: req.email,
            address: req.address,
        }
    }
}

impl From<UpdatePatientReq> for PatientPatch {
    fn from(req: UpdatePatientReq) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            date_of_birth: req.date_of_birth,
            gender: req.gender,
            contact_number: req.contact_number,
            email: req.email,
            address: req.address,
        }
    }
}

impl RestKind for PatientKind {
    const TAG: &'static str = "patients";

    type Dto = PatientDto;
    type CreateReq = CreatePatientReq;
    type UpdateReq = UpdatePatientReq;
}
