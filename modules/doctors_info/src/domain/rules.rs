//! Field rules for doctor payloads, keyed by wire (camelCase) field name.

use once_cell::sync::Lazy;
use recordkit::{FieldRules, FieldValue, Rule, Validate};
use regex::Regex;

use crate::contract::model::{DoctorPatch, NewDoctor};

static CONTACT_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10,15}$").expect("contact number pattern is valid"));

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
const CONTACT_DIGITS_MSG: &str = "Contact number must be 10-15 digits";
const EMAIL_EMPTY_MSG: &str = "Email cannot be empty";
const EMAIL_FORMAT: Rule = Rule::Email("Email should be valid");

static CREATE_RULES: [FieldRules; 6] = [
    FieldRules {
        field: "firstName",
        rules: &[Rule::NotBlank("First name cannot be empty"), FIRST_NAME_LEN],
    },
    FieldRules {
        field: "lastName",
        rules: &[Rule::NotBlank("Last name cannot be empty"), LAST_NAME_LEN],
    },
    FieldRules {
        field: "specialty",
        rules: &[Rule::NotBlank("Specialty cannot be empty")],
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
        field: "officeAddress",
        rules: &[Rule::NotBlank("Office address cannot be empty")],
    },
];

static UPDATE_RULES: [FieldRules; 4] = [
    FieldRules {
        field: "firstName",
        rules: &[FIRST_NAME_LEN],
    },
    FieldRules {
        field: "lastName",
        rules: &[LAST_NAME_LEN],
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

impl Validate for NewDoctor {
    fn rules() -> &'static [FieldRules] {
        &CREATE_RULES
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "firstName" => FieldValue::text(&self.first_name),
            "lastName" => FieldValue::text(&self.last_name),
            "specialty" => FieldValue::text(&self.specialty),
            "contactNumber" => FieldValue::text(&self.contact_number),
            "email" => FieldValue::text(&self.email),
            "officeAddress" => FieldValue::text(&self.office_address),
            _ => FieldValue::Absent,
        }
    }
}

impl Validate for DoctorPatch {
    fn rules() -> &'static [FieldRules] {
        &UPDATE_RULES
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "firstName" => FieldValue::opt_text(self.first_name.as_ref()),
            "lastName" => FieldValue::opt_text(self.last_name.as_ref()),
            "specialty" => FieldValue::opt_text(self.specialty.as_ref()),
            "contactNumber" => FieldValue::opt_text(self.contact_number.as_ref()),
            "email" => FieldValue::opt_text(self.email.as_ref()),
            "officeAddress" => FieldValue::opt_text(self.office_address.as_ref()),
            _ => FieldValue::Absent,
        }
    }
}
