use axum::http::StatusCode;

use crate::api::problem::{Problem, ProblemResponse};
use crate::error::RecordError;

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    instance: &str,
) -> ProblemResponse {
    let problem = Problem::new(status, title, detail)
        .with_type(format!("https://errors.dpms.local/{}", code))
        .with_code(code)
        .with_instance(instance);

    // Add request ID from current tracing span if available
    let problem = if let Some(id) = tracing::Span::current().id() {
        problem.with_request_id(id.into_u64().to_string())
    } else {
        problem
    };

    ProblemResponse(problem)
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &RecordError, instance: &str) -> ProblemResponse {
    let prefix = e.code_prefix();
    match e {
        RecordError::Validation { errors, .. } => {
            let mut resp = from_parts(
                StatusCode::BAD_REQUEST,
                &format!("{prefix}_VALIDATION"),
                "Validation error",
                format!("{} field(s) failed validation", errors.len()),
                instance,
            );
            resp.0 = resp.0.with_errors(errors.to_map());
            resp
        }
        RecordError::NotFound { .. } => from_parts(
            StatusCode::NOT_FOUND,
            &format!("{prefix}_NOT_FOUND"),
            "Not found",
            e.to_string(),
            instance,
        ),
        RecordError::Conflict { .. } => from_parts(
            StatusCode::CONFLICT,
            &format!("{prefix}_EMAIL_CONFLICT"),
            "Email already exists",
            e.to_string(),
            instance,
        ),
        RecordError::Unexpected { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Unexpected error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                "Internal error",
                "An internal error occurred",
                instance,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldErrors;
    use uuid::Uuid;

    #[test]
    fn maps_each_error_kind_to_status() {
        let id = Uuid::new_v4();
        let nf = map_domain_error(&RecordError::not_found("Doctor", id), "/api/doctors/x");
        assert_eq!(nf.0.status, 404);
        assert_eq!(nf.0.code, "DOCTOR_NOT_FOUND");
        assert!(nf.0.detail.contains(&id.to_string()));
        assert_eq!(nf.0.instance, "/api/doctors/x");

        let c = map_domain_error(&RecordError::conflict("Patient", "a@b.com"), "/");
        assert_eq!(c.0.status, 409);
        assert_eq!(c.0.code, "PATIENT_EMAIL_CONFLICT");

        let mut errors = FieldErrors::new();
        errors.insert("email", "Email should be valid");
        let v = map_domain_error(&RecordError::validation("Doctor", errors), "/");
        assert_eq!(v.0.status, 400);
        assert_eq!(
            v.0.errors.as_ref().and_then(|m| m.get("email")).map(String::as_str),
            Some("Email should be valid")
        );
    }

    #[test]
    fn unexpected_errors_hide_details() {
        let p = map_domain_error(&RecordError::unexpected("connection refused"), "/");
        assert_eq!(p.0.status, 500);
        assert_eq!(p.0.code, "INTERNAL");
        assert!(!p.0.detail.contains("connection refused"));
    }
}
