//! Generic REST handlers shared by every record kind.
//!
//! Handlers take the kind's service from a request `Extension`, delegate to it
//! and translate `RecordError`s into problem responses. Body and path
//! rejections are reported as 400 problems as well, so clients always get
//! `application/problem+json` on failure.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    http::{StatusCode, Uri},
    response::Json,
    Extension,
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::error::{from_parts, map_domain_error};
use crate::api::problem::ProblemResponse;
use crate::kind::RecordKind;
use crate::service::Service;

/// Transport shapes of a record kind.
pub trait RestKind: RecordKind {
    /// OpenAPI tag and operation id prefix ("doctors").
    const TAG: &'static str;

    /// Output payload: every persisted field including the identifier.
    type Dto: Serialize + ToSchema + From<Self::Record> + Send + 'static;
    /// Inbound creation body.
    type CreateReq: DeserializeOwned + ToSchema + Into<Self::New> + Send + 'static;
    /// Inbound partial update body.
    type UpdateReq: DeserializeOwned + ToSchema + Into<Self::Patch> + Send + 'static;
}

/// `deserialize_with` for required text fields of creation bodies: an explicit
/// `null` reads as empty text so the not-blank rule reports it per field.
pub fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

type Svc<K> = Extension<Arc<Service<K>>>;

fn invalid_request(detail: String, instance: &str) -> ProblemResponse {
    from_parts(
        StatusCode::BAD_REQUEST,
        "INVALID_REQUEST",
        "Bad Request",
        detail,
        instance,
    )
}

fn path_id(path: Result<Path<Uuid>, PathRejection>, uri: &Uri) -> Result<Uuid, ProblemResponse> {
    path.map(|Path(id)| id)
        .map_err(|rejection| invalid_request(rejection.body_text(), uri.path()))
}

/// List every record of the kind
pub async fn list_records<K: RestKind>(
    Extension(svc): Svc<K>,
    uri: Uri,
) -> Result<Json<Vec<K::Dto>>, ProblemResponse> {
    info!(kind = K::NAME, "Listing records");

    match svc.list().await {
        Ok(records) => Ok(Json(records.into_iter().map(K::Dto::from).collect())),
        Err(e) => {
            error!("Failed to list {}: {}", K::TAG, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Get a specific record by ID
pub async fn get_record<K: RestKind>(
    Extension(svc): Svc<K>,
    path: Result<Path<Uuid>, PathRejection>,
    uri: Uri,
) -> Result<Json<K::Dto>, ProblemResponse> {
    let id = path_id(path, &uri)?;
    info!(kind = K::NAME, "Getting record with id: {}", id);

    match svc.get(id).await {
        Ok(record) => Ok(Json(K::Dto::from(record))),
        Err(e) => {
            error!("Failed to get {} {}: {}", K::NAME, id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Create a new record
pub async fn create_record<K: RestKind>(
    uri: Uri,
    Extension(svc): Svc<K>,
    body: Result<Json<K::CreateReq>, JsonRejection>,
) -> Result<(StatusCode, Json<K::Dto>), ProblemResponse> {
    let Json(req_body) = body.map_err(|r| invalid_request(r.body_text(), uri.path()))?;
    info!(kind = K::NAME, "Creating record");

    match svc.create(req_body.into()).await {
        Ok(record) => Ok((StatusCode::CREATED, Json(K::Dto::from(record)))),
        Err(e) => {
            error!("Failed to create {}: {}", K::NAME, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Update an existing record with partial data
pub async fn update_record<K: RestKind>(
    uri: Uri,
    Extension(svc): Svc<K>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<K::UpdateReq>, JsonRejection>,
) -> Result<Json<K::Dto>, ProblemResponse> {
    let id = path_id(path, &uri)?;
    let Json(req_body) = body.map_err(|r| invalid_request(r.body_text(), uri.path()))?;
    info!(kind = K::NAME, "Updating record {}", id);

    match svc.update(id, req_body.into()).await {
        Ok(record) => Ok(Json(K::Dto::from(record))),
        Err(e) => {
            error!("Failed to update {} {}: {}", K::NAME, id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Delete a record by ID
pub async fn delete_record<K: RestKind>(
    Extension(svc): Svc<K>,
    path: Result<Path<Uuid>, PathRejection>,
    uri: Uri,
) -> Result<StatusCode, ProblemResponse> {
    let id = path_id(path, &uri)?;
    info!(kind = K::NAME, "Deleting record: {}", id);

    match svc.delete(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to delete {} {}: {}", K::NAME, id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}
