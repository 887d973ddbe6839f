use recordkit::RecordKind;
use uuid::Uuid;

use crate::contract::model::{NewPatient, Patient, PatientPatch};

pub struct PatientKind;

impl RecordKind for PatientKind {
    const NAME: &'static str = "Patient";

    type Record = Patient;
    type New = NewPatient;
    type Patch = PatientPatch;

    fn id(record: &Patient) -> Uuid {
        record.id
    }

    fn assign_id(record: &mut Patient, id: Uuid) {
        record.id = id;
    }

    fn email(record: &Patient) -> &str {
        &record.email
    }

    fn patch_email(patch: &PatientPatch) -> Option<&str> {
        patch.email.as_deref()
    }

    fn to_entity(new: NewPatient) -> Patient {
        Patient {
            id: Uuid::nil(),
            first_name: new.first_name,
            last_name: new.last_name,
            date_of_birth: new.date_of_birth,
            gender: new.gender,
            contact_number: new.contact_number,
            email: new.email,
            address: new.address,
        }
    }

    // An absent date of birth leaves the stored one in place; it is never cleared.
    fn apply_update(mut patient: Patient, patch: PatientPatch) -> Patient {
        if let Some(v) = patch.first_name {
            patient.first_name = v;
        }
        if let Some(v) = patch.last_name {
            patient.last_name = v;
        }
        if let Some(v) = patch.date_of_birth {
            patient.date_of_birth = Some(v);
        }
        if let Some(v) = patch.gender {
            patient.gender = v;
        }
        if let Some(v) = patch.contact_number {
            patient.contact_number = v;
        }
        if let Some(v) = patch.email {
            patient.email = v;
        }
        if let Some(v) = patch.address {
            patient.address = v;
        }
        patient
    }
}
