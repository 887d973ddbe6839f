#![allow(dead_code)]

//! A minimal record kind shared by the recordkit integration tests.

use recordkit::{
    FieldRules, FieldValue, OpenApiRegistry, OperationSpec, RecordKind, RestKind, Rule,
    SchemaCollection, Validate,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub struct ContactKind;

#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct NewContact {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

static NEW_RULES: [FieldRules; 2] = [
    FieldRules {
        field: "name",
        rules: &[Rule::NotBlank("Name cannot be empty")],
    },
    FieldRules {
        field: "email",
        rules: &[
            Rule::NotBlank("Email cannot be empty"),
            Rule::Email("Email should be valid"),
        ],
    },
];

static PATCH_RULES: [FieldRules; 1] = [FieldRules {
    field: "email",
    rules: &[Rule::Email("Email should be valid")],
}];

impl Validate for NewContact {
    fn rules() -> &'static [FieldRules] {
        &NEW_RULES
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "name" => FieldValue::text(&self.name),
            "email" => FieldValue::text(&self.email),
            _ => FieldValue::Absent,
        }
    }
}

impl Validate for ContactPatch {
    fn rules() -> &'static [FieldRules] {
        &PATCH_RULES
    }

    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "name" => FieldValue::opt_text(self.name.as_ref()),
            "email" => FieldValue::opt_text(self.email.as_ref()),
            _ => FieldValue::Absent,
        }
    }
}

impl RecordKind for ContactKind {
    const NAME: &'static str = "Contact";

    type Record = Contact;
    type New = NewContact;
    type Patch = ContactPatch;

    fn id(record: &Contact) -> Uuid {
        record.id
    }

    fn assign_id(record: &mut Contact, id: Uuid) {
        record.id = id;
    }

    fn email(record: &Contact) -> &str {
        &record.email
    }

    fn patch_email(patch: &ContactPatch) -> Option<&str> {
        patch.email.as_deref()
    }

    fn to_entity(new: NewContact) -> Contact {
        Contact {
            id: Uuid::nil(),
            name: new.name,
            email: new.email,
        }
    }

    fn apply_update(mut record: Contact, patch: ContactPatch) -> Contact {
        if let Some(name) = patch.name {
            record.name = name;
        }
        if let Some(email) = patch.email {
            record.email = email;
        }
        record
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<Contact> for ContactDto {
    fn from(c: Contact) -> Self {
        Self {
            id: c.id,
            name: c.name,
            email: c.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateContactReq {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl From<CreateContactReq> for NewContact {
    fn from(r: CreateContactReq) -> Self {
        Self {
            name: r.name,
            email: r.email,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateContactReq {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl From<UpdateContactReq> for ContactPatch {
    fn from(r: UpdateContactReq) -> Self {
        Self {
            name: r.name,
            email: r.email,
        }
    }
}

impl RestKind for ContactKind {
    const TAG: &'static str = "contacts";

    type Dto = ContactDto;
    type CreateReq = CreateContactReq;
    type UpdateReq = UpdateContactReq;
}

pub fn new_contact(name: &str, email: &str) -> NewContact {
    NewContact {
        name: name.to_string(),
        email: email.to_string(),
    }
}

/// Mock OpenAPI registry that keeps the registered operations.
#[derive(Default)]
pub struct MockOpenApiRegistry {
    pub operations: parking_lot::Mutex<Vec<OperationSpec>>,
}

impl OpenApiRegistry for MockOpenApiRegistry {
    fn register_operation(&self, spec: &OperationSpec) {
        self.operations.lock().push(spec.clone());
    }

    fn ensure_schema_raw(&self, name: &str, _schemas: SchemaCollection) -> String {
        name.to_string()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
