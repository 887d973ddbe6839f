use thiserror::Error;
use uuid::Uuid;

use crate::validation::FieldErrors;

/// Typed outcome of a failed lifecycle operation.
///
/// `kind` is the entity kind name (`RecordKind::NAME`) so messages and error
/// codes stay specific without one enum per module.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("{kind} payload is invalid: {errors}")]
    Validation {
        kind: &'static str,
        errors: FieldErrors,
    },

    #[error("{kind} not found with id: {id}")]
    NotFound { kind: &'static str, id: Uuid },

    #[error("{kind} with email '{email}' already exists")]
    Conflict { kind: &'static str, email: String },

    #[error("Unexpected error: {message}")]
    Unexpected { message: String },
}

impl RecordError {
    pub fn validation(kind: &'static str, errors: FieldErrors) -> Self {
        Self::Validation { kind, errors }
    }

    pub fn not_found(kind: &'static str, id: Uuid) -> Self {
        Self::NotFound { kind, id }
    }

    pub fn conflict(kind: &'static str, email: impl Into<String>) -> Self {
        Self::Conflict {
            kind,
            email: email.into(),
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Stable upper-case prefix for machine-readable error codes ("DOCTOR").
    pub fn code_prefix(&self) -> String {
        match self {
            Self::Validation { kind, .. }
            | Self::NotFound { kind, .. }
            | Self::Conflict { kind, .. } => kind.to_ascii_uppercase(),
            Self::Unexpected { .. } => "INTERNAL".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_carries_id() {
        let id = Uuid::new_v4();
        let e = RecordError::not_found("Doctor", id);
        assert_eq!(e.to_string(), format!("Doctor not found with id: {id}"));
        assert_eq!(e.code_prefix(), "DOCTOR");
    }

    #[test]
    fn conflict_and_validation_messages() {
        let e = RecordError::conflict("Patient", "a@b.com");
        assert_eq!(e.to_string(), "Patient with email 'a@b.com' already exists");

        let mut errors = FieldErrors::new();
        errors.insert("firstName", "First name cannot be empty");
        let e = RecordError::validation("Patient", errors);
        assert_eq!(
            e.to_string(),
            "Patient payload is invalid: firstName: First name cannot be empty"
        );
        assert_eq!(RecordError::unexpected("boom").code_prefix(), "INTERNAL");
    }
}
