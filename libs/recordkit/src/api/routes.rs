use std::sync::Arc;

use anyhow::bail;
use axum::{Extension, Router};

use crate::api::openapi::OpenApiRegistry;
use crate::api::operation_builder::{Missing, OperationBuilder};
use crate::api::rest::{self, RestKind};
use crate::service::Service;

type Op = OperationBuilder<Missing, Missing, ()>;

/// Mount the five record operations of kind `K` under `prefix`
/// (`/api/doctors` → `/api/doctors` and `/api/doctors/{id}`).
pub fn register_routes<K: RestKind>(
    router: Router,
    openapi: &dyn OpenApiRegistry,
    service: Arc<Service<K>>,
    prefix: &str,
) -> anyhow::Result<Router> {
    if !prefix.starts_with('/') || prefix.ends_with('/') {
        bail!("route prefix '{prefix}' must start with '/' and must not end with '/'");
    }
    let item = format!("{prefix}/{{id}}");
    let tag = K::TAG;
    let id_desc = format!("{} UUID", K::NAME);

    let mut routes = Router::new();

    // GET {prefix} - List all records
    routes = Op::get(prefix)
        .operation_id(format!("{tag}.list"))
        .summary(format!("List all {tag}"))
        .tag(tag)
        .handler(rest::list_records::<K>)
        .json_array_response::<K::Dto>(openapi, 200, format!("All {tag}"))
        .problem_response(openapi, 500, "Internal Server Error")
        .register(routes, openapi);

    // GET {prefix}/{id} - Get one record
    routes = Op::get(&item)
        .operation_id(format!("{tag}.get"))
        .summary(format!("Get {} by ID", K::NAME))
        .tag(tag)
        .uuid_path_param("id", &id_desc)
        .handler(rest::get_record::<K>)
        .json_response::<K::Dto>(openapi, 200, format!("{} found", K::NAME))
        .problem_response(openapi, 400, "Bad Request")
        .problem_response(openapi, 404, "Not Found")
        .problem_response(openapi, 500, "Internal Server Error")
        .register(routes, openapi);

    // POST {prefix} - Create a record
    routes = Op::post(prefix)
        .operation_id(format!("{tag}.create"))
        .summary(format!("Create a new {}", K::NAME))
        .tag(tag)
        .json_request::<K::CreateReq>(openapi, format!("{} creation data", K::NAME))
        .handler(rest::create_record::<K>)
        .json_response::<K::Dto>(openapi, 201, format!("Created {}", K::NAME))
        .problem_response(openapi, 400, "Bad Request")
        .problem_response(openapi, 409, "Conflict")
        .problem_response(openapi, 500, "Internal Server Error")
        .register(routes, openapi);

    // PUT {prefix}/{id} - Partial update
    routes = Op::put(&item)
        .operation_id(format!("{tag}.update"))
        .summary(format!("Update {}", K::NAME))
        .description("Fields that are absent from the body keep their stored value")
        .tag(tag)
        .uuid_path_param("id", &id_desc)
        .json_request::<K::UpdateReq>(openapi, format!("{} update data", K::NAME))
        .handler(rest::update_record::<K>)
        .json_response::<K::Dto>(openapi, 200, format!("Updated {}", K::NAME))
        .problem_response(openapi, 400, "Bad Request")
        .problem_response(openapi, 404, "Not Found")
        .problem_response(openapi, 409, "Conflict")
        .problem_response(openapi, 500, "Internal Server Error")
        .register(routes, openapi);

    // DELETE {prefix}/{id} - Delete a record
    routes = Op::delete(&item)
        .operation_id(format!("{tag}.delete"))
        .summary(format!("Delete {}", K::NAME))
        .tag(tag)
        .uuid_path_param("id", &id_desc)
        .handler(rest::delete_record::<K>)
        .empty_response(204, format!("{} deleted", K::NAME))
        .problem_response(openapi, 400, "Bad Request")
        .problem_response(openapi, 404, "Not Found")
        .problem_response(openapi, 500, "Internal Server Error")
        .register(routes, openapi);

    let routes = routes.layer(Extension(service));

    Ok(router.merge(routes))
}
