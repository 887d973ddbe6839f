//! OpenAPI 3.1 document assembled from the registered operation specs.

use std::collections::BTreeMap;

use recordkit::api::openapi::{ParamLocation, ParamSpec, RequestBodySpec, ResponseSpec};
use recordkit::OperationSpec;
use serde::Serialize;
use serde_json::{json, Map, Value};
use utoipa::openapi::{schema::Schema, RefOr};

pub const TITLE: &str = "DPMS API";

#[derive(Serialize)]
pub struct OpenApi {
    pub openapi: &'static str,
    pub info: Info,
    pub paths: BTreeMap<String, BTreeMap<String, Value>>,
    pub components: Components,
}

#[derive(Serialize)]
pub struct Info {
    pub title: &'static str,
    pub version: &'static str,
    pub description: &'static str,
}

#[derive(Serialize, Default)]
pub struct Components {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub schemas: BTreeMap<String, RefOr<Schema>>,
}

fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{name}") })
}

fn content(
    content_type: &str,
    schema_name: Option<&str>,
    is_array: bool,
    components: &Components,
) -> Value {
    let schema = match schema_name.filter(|n| components.schemas.contains_key(*n)) {
        Some(name) if is_array => json!({ "type": "array", "items": schema_ref(name) }),
        Some(name) => schema_ref(name),
        None if content_type.ends_with("json") => json!({ "type": "object" }),
        None => json!({}),
    };
    json!({ content_type: { "schema": schema } })
}

fn parameter(p: &ParamSpec) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), "string".into());
    if let Some(format) = p.format {
        schema.insert("format".into(), format.into());
    }
    let (location, required) = match p.location {
        // path parameters are always required
        ParamLocation::Path => ("path", true),
        ParamLocation::Query => ("query", p.required),
    };
    let mut param = json!({
        "name": p.name,
        "in": location,
        "required": required,
        "schema": schema,
    });
    if let Some(desc) = &p.description {
        param["description"] = desc.clone().into();
    }
    param
}

fn request_body(rb: &RequestBodySpec, components: &Components) -> Value {
    let mut body = json!({
        "required": rb.required,
        "content": content(rb.content_type, rb.schema_name.as_deref(), false, components),
    });
    if let Some(desc) = &rb.description {
        body["description"] = desc.clone().into();
    }
    body
}

fn response(r: &ResponseSpec, components: &Components) -> Value {
    let mut obj = json!({ "description": r.description });
    // 204 carries no body
    if r.schema_name.is_some() {
        obj["content"] = content(r.content_type, r.schema_name.as_deref(), r.is_array, components);
    }
    obj
}

fn operation(spec: &OperationSpec, components: &Components) -> Value {
    let mut op = Map::new();
    if let Some(id) = &spec.operation_id {
        op.insert("operationId".into(), id.clone().into());
    }
    if let Some(summary) = &spec.summary {
        op.insert("summary".into(), summary.clone().into());
    }
    if let Some(desc) = &spec.description {
        op.insert("description".into(), desc.clone().into());
    }
    if !spec.tags.is_empty() {
        op.insert("tags".into(), json!(spec.tags));
    }
    if !spec.params.is_empty() {
        op.insert(
            "parameters".into(),
            Value::Array(spec.params.iter().map(parameter).collect()),
        );
    }
    if let Some(rb) = &spec.request_body {
        op.insert("requestBody".into(), request_body(rb, components));
    }
    let responses: Map<String, Value> = spec
        .responses
        .iter()
        .map(|r| (r.status.to_string(), response(r, components)))
        .collect();
    op.insert("responses".into(), Value::Object(responses));
    Value::Object(op)
}

/// Group operations by path; each path item holds one entry per method.
pub fn build_document<'a>(
    specs: impl IntoIterator<Item = &'a OperationSpec>,
    components: Components,
) -> OpenApi {
    let mut paths: BTreeMap<String, BTreeMap<String, Value>> = BTreeMap::new();
    for spec in specs {
        paths
            .entry(spec.path.clone())
            .or_default()
            .insert(spec.method.as_str().to_lowercase(), operation(spec, &components));
    }

    OpenApi {
        openapi: "3.1.0",
        info: Info {
            title: TITLE,
            version: env!("CARGO_PKG_VERSION"),
            description: "Doctor and patient record management",
        },
        paths,
        components,
    }
}
