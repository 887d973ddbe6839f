use recordkit::RecordKind;
use uuid::Uuid;

use crate::contract::model::{Doctor, DoctorPatch, NewDoctor};

/// Doctor descriptor for the generic lifecycle manager.
pub struct DoctorKind;

impl RecordKind for DoctorKind {
    const NAME: &'static str = "Doctor";

    type Record = Doctor;
    type New = NewDoctor;
    type Patch = DoctorPatch;

    fn id(record: &Doctor) -> Uuid {
        record.id
    }

    fn assign_id(record: &mut Doctor, id: Uuid) {
        record.id = id;
    }

    fn email(record: &Doctor) -> &str {
        &record.email
    }

    fn patch_email(patch: &DoctorPatch) -> Option<&str> {
        patch.email.as_deref()
    }

    fn to_entity(new: NewDoctor) -> Doctor {
        Doctor {
            id: Uuid::nil(),
            first_name: new.first_name,
            last_name: new.last_name,
            specialty: new.specialty,
            contact_number: new.contact_number,
            email: new.email,
            office_address: new.office_address,
        }
    }

    fn apply_update(mut doctor: Doctor, patch: DoctorPatch) -> Doctor {
        if let Some(v) = patch.first_name {
            doctor.first_name = v;
        }
        if let Some(v) = patch.last_name {
            doctor.last_name = v;
        }
        if let Some(v) = patch.specialty {
            doctor.specialty = v;
        }
        if let Some(v) = patch.contact_number {
            doctor.contact_number = v;
        }
        if let Some(v) = patch.email {
            doctor.email = v;
        }
        if let Some(v) = patch.office_address {
            doctor.office_address = v;
        }
        doctor
    }
}
