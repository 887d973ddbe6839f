use chrono::NaiveDate;
use uuid::Uuid;

/// Pure patient model (no serde/utoipa)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Always set for patients created through the service; the column allows null.
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub contact_number: String,
    pub email: String,
    pub address: String,
}

/// Data for creating a new patient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub contact_number: String,
    pub email: String,
    pub address: String,
}

/// Partial update data for a patient
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatientPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}
