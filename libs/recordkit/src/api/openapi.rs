//! Operation descriptions handed to the HTTP host, which turns them into an
//! OpenAPI document.

use axum::http::Method;
use utoipa::openapi::{schema::Schema, RefOr};

/// Type alias for schema collections used in API operations.
pub type SchemaCollection = Vec<(String, RefOr<Schema>)>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamLocation {
    Path,
    Query,
}

#[derive(Clone, Debug)]
pub struct ParamSpec {
    pub name: String,
    pub location: ParamLocation,
    pub required: bool,
    pub description: Option<String>,
    /// JSON Schema format of a string parameter ("uuid").
    pub format: Option<&'static str>,
}

#[derive(Clone, Debug)]
pub struct RequestBodySpec {
    pub content_type: &'static str,
    pub description: Option<String>,
    /// Registered component name referenced by `$ref`.
    pub schema_name: Option<String>,
    pub required: bool,
}

#[derive(Clone, Debug)]
pub struct ResponseSpec {
    pub status: u16,
    pub content_type: &'static str,
    pub description: String,
    pub schema_name: Option<String>,
    /// Body is a JSON array of `schema_name` items.
    pub is_array: bool,
}

/// One documented HTTP operation.
#[derive(Clone, Debug)]
pub struct OperationSpec {
    pub method: Method,
    pub path: String,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub params: Vec<ParamSpec>,
    pub request_body: Option<RequestBodySpec>,
    pub responses: Vec<ResponseSpec>,
}

/// Registry for OpenAPI operations and schemas, implemented by the HTTP host.
pub trait OpenApiRegistry: Send + Sync {
    fn register_operation(&self, spec: &OperationSpec);

    /// Ensure the given schemas are present under components and return the
    /// canonical component name of the root schema for `$ref`.
    fn ensure_schema_raw(&self, name: &str, schemas: SchemaCollection) -> String;

    /// Downcast support for accessing the concrete implementation if needed.
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Helper function to call ensure_schema with proper type information
pub fn ensure_schema<T: utoipa::ToSchema + 'static>(registry: &dyn OpenApiRegistry) -> String {
    use utoipa::PartialSchema;

    let root_name = T::name().to_string();

    // T's own schema goes first (the object, not a ref), then its dependencies.
    let mut collected: SchemaCollection = vec![(root_name.clone(), <T as PartialSchema>::schema())];
    T::schemas(&mut collected);

    registry.ensure_schema_raw(&root_name, collected)
}
