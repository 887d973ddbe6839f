mod common;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use common::{ContactDto, ContactKind, CreateContactReq, MockOpenApiRegistry, UpdateContactReq};
use recordkit::{register_routes, InMemoryStore, Service, ServiceConfig, APPLICATION_PROBLEM_JSON};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

fn create_test_router() -> Router {
    let service = Arc::new(Service::new(
        Arc::new(InMemoryStore::<ContactKind>::new()),
        ServiceConfig::default(),
    ));
    let openapi = MockOpenApiRegistry::default();
    register_routes::<ContactKind>(Router::new(), &openapi, service, "/api/contacts")
        .expect("Failed to register routes")
}

fn json_request(method: Method, uri: &str, body: &impl serde::Serialize) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Result<Value> {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&body)?)
}

#[tokio::test]
async fn full_lifecycle_over_http() -> Result<()> {
    let router = create_test_router();

    let create = CreateContactReq {
        name: "Ann".into(),
        email: "ann@x.com".into(),
    };
    let response = router
        .clone()
        .oneshot(json_request(Method::POST, "/api/contacts", &create))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: ContactDto = serde_json::from_value(body_json(response).await?)?;
    assert_eq!(created.name, "Ann");

    let item = format!("/api/contacts/{}", created.id);

    let response = router.clone().oneshot(empty_request(Method::GET, &item)).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let update = UpdateContactReq {
        name: Some("Annie".into()),
        email: None,
    };
    let response = router
        .clone()
        .oneshot(json_request(Method::PUT, &item, &update))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await?;
    assert_eq!(updated["name"], "Annie");
    assert_eq!(updated["email"], "ann@x.com");

    let response = router
        .clone()
        .oneshot(empty_request(Method::GET, "/api/contacts"))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await?.as_array().map(Vec::len), Some(1));

    let response = router
        .clone()
        .oneshot(empty_request(Method::DELETE, &item))
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router.oneshot(empty_request(Method::GET, &item)).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn validation_errors_are_field_maps() -> Result<()> {
    let router = create_test_router();

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/contacts",
            &serde_json::json!({"email": "nope"}),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()["content-type"].to_str()?,
        APPLICATION_PROBLEM_JSON
    );
    let problem = body_json(response).await?;
    assert_eq!(problem["code"], "CONTACT_VALIDATION");
    assert_eq!(problem["errors"]["name"], "Name cannot be empty");
    assert_eq!(problem["errors"]["email"], "Email should be valid");
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_conflict() -> Result<()> {
    let router = create_test_router();
    let create = CreateContactReq {
        name: "Ann".into(),
        email: "ann@x.com".into(),
    };

    let first = router
        .clone()
        .oneshot(json_request(Method::POST, "/api/contacts", &create))
        .await?;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = router
        .oneshot(json_request(Method::POST, "/api/contacts", &create))
        .await?;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(second).await?["code"], "CONTACT_EMAIL_CONFLICT");
    Ok(())
}

#[tokio::test]
async fn malformed_input_is_bad_request() -> Result<()> {
    let router = create_test_router();

    let response = router
        .clone()
        .oneshot(empty_request(Method::GET, "/api/contacts/not-a-uuid"))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await?["code"], "INVALID_REQUEST");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/contacts")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))?;
    let response = router.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn unknown_ids_are_not_found() -> Result<()> {
    let router = create_test_router();
    let item = format!("/api/contacts/{}", Uuid::new_v4());

    let response = router
        .clone()
        .oneshot(json_request(Method::PUT, &item, &UpdateContactReq::default()))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router.oneshot(empty_request(Method::DELETE, &item)).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let problem = body_json(response).await?;
    assert_eq!(problem["code"], "CONTACT_NOT_FOUND");
    assert_eq!(problem["instance"], item);
    Ok(())
}

#[test]
fn operations_are_documented() {
    let service = Arc::new(Service::new(
        Arc::new(InMemoryStore::<ContactKind>::new()),
        ServiceConfig::default(),
    ));
    let openapi = MockOpenApiRegistry::default();
    register_routes::<ContactKind>(Router::new(), &openapi, service, "/api/contacts").unwrap();

    let ops = openapi.operations.lock();
    let ids: Vec<_> = ops.iter().filter_map(|o| o.operation_id.clone()).collect();
    assert_eq!(
        ids,
        vec![
            "contacts.list",
            "contacts.get",
            "contacts.create",
            "contacts.update",
            "contacts.delete"
        ]
    );
    assert!(ops.iter().all(|o| o.tags == vec!["contacts"]));
}

#[test]
fn bad_prefix_is_rejected() {
    let service = Arc::new(Service::new(
        Arc::new(InMemoryStore::<ContactKind>::new()),
        ServiceConfig::default(),
    ));
    let openapi = MockOpenApiRegistry::default();
    assert!(register_routes::<ContactKind>(Router::new(), &openapi, service.clone(), "api").is_err());
    assert!(
        register_routes::<ContactKind>(Router::new(), &openapi, service, "/api/contacts/").is_err()
    );
}
