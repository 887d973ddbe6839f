use once_cell::sync::Lazy;
use recordkit::{FieldRules, FieldValue, Rule, Validate};
use regex::Regex;

use crate::contract::model::{NewPatient, PatientPatch};

static CONTACT_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10,15}$").expect("contact number pattern is valid"));

const CONTACT_DIGITS_MSG: &str = "Contact number must be 10-15 digits";
const FIRST_NAME_LEN: Rule = Rule::Length {
    min: 2,
    max: 50,
    message: "First name must be between 2 and 50 characters",
};
const LAST_NAME_LEN: Rule = Rule::Length {
    min: 2,
    max: 50,
    message: "Last name must be between 2 and 50 characters",
};
const DOB_NOT_FUTURE: Rule = Rule::PastOrPresent("Date of birth cannot be in the future");
const EMAIL_EMPTY_MSG: &str = "Email cannot be empty";
const EMAIL_FORMAT: Rule = Rule::Email("Email should be valid");

static CREATE_RULES: [FieldRules; 7] = [
    FieldRules {
        field: "firstName",
        rules: &[Rule::NotBlank("First name cannot be empty"), FIRST_NAME_LEN],
    },
    FieldRules {
        field: "lastName",
        rules: &[Rule::NotBlank("Last name cannot be empty"), LAST_NAME_LEN],
    },
    FieldRules {
        field: "dateOfBirth",
        rules: &[Rule::Required("Date of birth cannot be null"), DOB_NOT_FUTURE],
    },
    FieldRules {
        field: "gender",
        rules: &[Rule::NotBlank("Gender cannot be empty")],
    },
    FieldRules {
        field: "contactNumber",
        rules: &[
            Rule::NotBlank("Contact number cannot be empty"),
            Rule::Pattern {
                regex: &CONTACT_NUMBER,
                message: CONTACT_DIGITS_MSG,
            },
        ],
    },
    FieldRules {
        field: "email",
        rules: &[Rule::NotBlank(EMAIL_EMPTY_MSG), EMAIL_FORMAT],
    },
    FieldRules {
        field: "address",
        rules: &[Rule::NotBlank("Address cannot be empty")],
    },
];

static UPDATE_RULES: [FieldRules; 5] = [
    FieldRules {
        field: "firstName",
        rules: &[FIRST_NAME_LEN],
    },
    FieldRules {
        field: "lastName",
        rules: &[LAST_NAME_LEN],
    },
    FieldRules {
        field: "dateOfBirth",
        rules: &[DOB_NOT_FUTURE],
    },
    FieldRules {
        field: "contactNumber",
        rules: &[Rule::Pattern {
            regex: &CONTACT_NUMBER,
            message: CONTACT_DIGITS_MSG,
        }],
    },
    FieldRules {
        field: "email",
        rules: &[Rule::Filled(EMAIL_EMPTY_MSG), EMAIL_FORMAT],
    },
];

impl Validate for NewPatient {
    fn rules() -> &'static [FieldRules] {
        &CREATE_RULES
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "firstName" => FieldValue::text(&self.first_name),
            "lastName" => FieldValue::text(&self.last_name),
            "dateOfBirth" => FieldValue::opt_date(self.date_of_birth),
            "gender" => FieldValue::text(&self.gender),
            "contactNumber" => FieldValue::text(&self.contact_number),
            "email" => FieldValue::text(&self.email),
            "address" => FieldValue::text(&self.address),
            _ => FieldValue::Absent,
        }
    }
}

impl Validate for PatientPatch {
    fn rules() -> &'static [FieldRules] {
        &UPDATE_RULES
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "firstName" => FieldValue::opt_text(self.first_name.as_ref()),
            "lastName" => FieldValue::opt_text(self.last_name.as_ref()),
            "dateOfBirth" => FieldValue::opt_date(self.date_of_birth),
            "gender" => FieldValue::opt_text(self.gender.as_ref()),
            "contactNumber" => FieldValue::opt_text(self.contact_number.as_ref()),
            "email" => FieldValue::opt_text(self.email.as_ref()),
            "address" => FieldValue::opt_text(self.address.as_ref()),
            _ => FieldValue::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use recordkit::validate_at;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn jane() -> NewPatient {
        NewPatient {
            first_name: "Jane".into(),
            last_name: "Roe".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 12),
            gender: "female".into(),
            contact_number: "5559876543".into(),
            email: "jane@x.com".into(),
            address: "2 Elm St".into(),
        }
    }

    #[test]
    fn valid_patient_passes() {
        assert!(validate_at(&jane(), today()).is_ok());
    }

    #[test]
    fn date_of_birth_is_required_on_create() {
        let p = NewPatient {
            date_of_birth: None,
            ..jane()
        };
        let errors = validate_at(&p, today()).unwrap_err();
        assert_eq!(errors.get("dateOfBirth"), Some("Date of birth cannot be null"));
    }

    #[test]
    fn date_of_birth_boundaries() {
        let born_today = NewPatient {
            date_of_birth: Some(today()),
            ..jane()
        };
        assert!(validate_at(&born_today, today()).is_ok());

        let tomorrow = today().succ_opt().unwrap();
        let errors = validate_at(
            &NewPatient {
                date_of_birth: Some(tomorrow),
                ..jane()
            },
            today(),
        )
        .unwrap_err();
        assert_eq!(
            errors.get("dateOfBirth"),
            Some("Date of birth cannot be in the future")
        );

        let patch = PatientPatch {
            date_of_birth: Some(tomorrow),
            ..Default::default()
        };
        assert!(validate_at(&patch, today()).is_err());
    }

    #[test]
    fn blank_gender_and_address() {
        let p = NewPatient {
            gender: " ".into(),
            address: "".into(),
            ..jane()
        };
        let errors = validate_at(&p, today()).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("gender"), Some("Gender cannot be empty"));
        assert_eq!(errors.get("address"), Some("Address cannot be empty"));
    }

    #[test]
    fn patch_ignores_blank_gender() {
        let patch = PatientPatch {
            gender: Some("".into()),
            contact_number: Some("12ab".into()),
            ..Default::default()
        };
        let errors = validate_at(&patch, today()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("contactNumber"),
            Some("Contact number must be 10-15 digits")
        );
    }
}
