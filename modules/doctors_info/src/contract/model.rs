use uuid::Uuid;

/// Pure doctor model (no serde/utoipa)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctor {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
    pub contact_number: String,
    pub email: String,
    pub office_address: String,
}

/// Data for creating a new doctor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDoctor {
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
    pub contact_number: String,
    pub email: String,
    pub office_address: String,
}

/// Partial update data for a doctor
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DoctorPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub specialty: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub office_address: Option<String>,
}
