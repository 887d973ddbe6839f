pub mod kind;
pub mod rules;

pub use kind::DoctorKind;
