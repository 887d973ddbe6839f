use recordkit::{null_as_empty, RestKind};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::model::{Doctor, DoctorPatch, NewDoctor};
use crate::domain::DoctorKind;

/// REST DTO for doctor representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
    pub contact_number: String,
    pub email: String,
    pub office_address: String,
}

/// REST DTO for creating a new doctor.
/// Missing or null fields decode as empty text and are reported by validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateDoctorReq {
    #[serde(deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub specialty: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub contact_number: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub office_address: String,
}

/// REST DTO for updating a doctor (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDoctorReq {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub specialty: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub office_address: Option<String>,
}

impl From<Doctor> for DoctorDto {
    fn from(d: Doctor) -> Self {
        Self {
            id: d.id,
            first_name: d.first_name,
            last_name: d.last_name,
            specialty: d.specialty,
            contact_number: d.contact_number,
            email: d.email,
            office_address: d.office_address,
        }
    }
}

impl From<CreateDoctorReq> for NewDoctor {
    fn from(req: CreateDoctorReq) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            specialty: req.specialty,
            contact_number: req.contact_number,
            email: req.email,
            office_address: req.office_address,
        }
    }
}

impl From<UpdateDoctorReq> for DoctorPatch {
    fn from(req: UpdateDoctorReq) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            specialty: req.specialty,
            contact_number: req.contact_number,
            email: req.email,
            office_address: req.office_address,
        }
    }
}

impl RestKind for DoctorKind {
    const TAG: &'static str = "doctors";

    type Dto = DoctorDto;
    type CreateReq = CreateDoctorReq;
    type UpdateReq = UpdateDoctorReq;
}
