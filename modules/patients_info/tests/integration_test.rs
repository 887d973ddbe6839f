use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate, Utc};
use recordkit::{
    DbModule, Module, ModuleCtxBuilder, OpenApiRegistry, OperationSpec, RestfulModule,
    SchemaCollection,
};
use sea_orm::Database;
use serde_json::{json, Value};
use tower::ServiceExt;

use patients_info::{PatientPatch, PatientsInfo, MODULE_NAME};

struct NoopRegistry;

impl OpenApiRegistry for NoopRegistry {
    fn register_operation(&self, _spec: &OperationSpec) {}

    fn ensure_schema_raw(&self, name: &str, _schemas: SchemaCollection) -> String {
        name.to_string()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

async fn started_module() -> (Arc<PatientsInfo>, Router) {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    let ctx = ModuleCtxBuilder::new()
        .with_db(db.clone())
        .build()
        .for_module(MODULE_NAME);

    let module = Arc::new(PatientsInfo::new());
    module.init(&ctx).await.expect("init");
    module.migrate(&db).await.expect("migrate");
    let router = module
        .register_rest(&ctx, Router::new(), &NoopRegistry)
        .expect("Failed to register routes");
    (module, router)
}

fn jane() -> Value {
    json!({
        "firstName": "Jane",
        "lastName": "Roe",
        "dateOfBirth": "1990-04-12",
        "gender": "female",
        "contactNumber": "5559876543",
        "email": "jane@x.com",
        "address": "2 Elm St"
    })
}

fn with(mut base: Value, key: &str, value: Value) -> Value {
    base[key] = value;
    base
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<&Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let resp = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn date_of_birth_round_trips_through_sqlite() {
    let (module, router) = started_module().await;

    let (status, created) = send(&router, Method::POST, "/api/patients", Some(&jane())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["dateOfBirth"], "1990-04-12");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, fetched) = send(&router, Method::GET, &format!("/api/patients/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    // the same record through the service
    let service = module.service().unwrap();
    let patient = service.get(id.parse().unwrap()).await.unwrap();
    assert_eq!(patient.date_of_birth, NaiveDate::from_ymd_opt(1990, 4, 12));
}

#[tokio::test]
async fn date_of_birth_rules_on_create() {
    let (_module, router) = started_module().await;

    let mut missing = jane();
    missing.as_object_mut().unwrap().remove("dateOfBirth");
    let (status, problem) = send(&router, Method::POST, "/api/patients", Some(&missing)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["code"], "PATIENT_VALIDATION");
    assert_eq!(problem["errors"]["dateOfBirth"], "Date of birth cannot be null");

    let future_date = (Utc::now().date_naive() + Duration::days(2)).to_string();
    let future = with(jane(), "dateOfBirth", json!(future_date));
    let (status, problem) = send(&router, Method::POST, "/api/patients", Some(&future)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        problem["errors"],
        json!({ "dateOfBirth": "Date of birth cannot be in the future" })
    );

    let (_, list) = send(&router, Method::GET, "/api/patients", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn null_fields_are_reported_per_field() {
    let (_module, router) = started_module().await;

    let body = with(with(jane(), "gender", Value::Null), "dateOfBirth", Value::Null);
    let (status, problem) = send(&router, Method::POST, "/api/patients", Some(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["code"], "PATIENT_VALIDATION");
    assert_eq!(
        problem["errors"],
        json!({
            "dateOfBirth": "Date of birth cannot be null",
            "gender": "Gender cannot be empty"
        })
    );
}

#[tokio::test]
async fn update_cannot_blank_the_email() {
    let (_module, router) = started_module().await;
    let (_, created) = send(&router, Method::POST, "/api/patients", Some(&jane())).await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, problem) = send(
        &router,
        Method::PUT,
        &format!("/api/patients/{id}"),
        Some(&json!({ "email": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["errors"], json!({ "email": "Email cannot be empty" }));

    let (_, stored) = send(&router, Method::GET, &format!("/api/patients/{id}"), None).await;
    assert_eq!(stored["email"], "jane@x.com");
}

#[tokio::test]
async fn malformed_date_is_a_bad_request() {
    let (_module, router) = started_module().await;
    let bad = with(jane(), "dateOfBirth", json!("12/04/1990"));
    let (status, problem) = send(&router, Method::POST, "/api/patients", Some(&bad)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let (module, router) = started_module().await;
    let (_, created) = send(&router, Method::POST, "/api/patients", Some(&jane())).await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &router,
        Method::PUT,
        &format!("/api/patients/{id}"),
        Some(&json!({ "address": "9 Oak Ave" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["address"], "9 Oak Ave");
    assert_eq!(updated["dateOfBirth"], "1990-04-12");
    assert_eq!(updated["email"], "jane@x.com");

    // empty patch is a no-op
    let service = module.service().unwrap();
    let before = service.get(id.parse().unwrap()).await.unwrap();
    let after = service
        .update(before.id, PatientPatch::default())
        .await
        .unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn email_taken_by_another_patient_on_update() {
    let (_module, router) = started_module().await;
    send(&router, Method::POST, "/api/patients", Some(&jane())).await;
    let (_, sam) = send(
        &router,
        Method::POST,
        "/api/patients",
        Some(&with(jane(), "email", json!("sam@x.com"))),
    )
    .await;
    let sam_id = sam["id"].as_str().unwrap().to_string();

    let (status, problem) = send(
        &router,
        Method::PUT,
        &format!("/api/patients/{sam_id}"),
        Some(&json!({ "email": "jane@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(problem["code"], "PATIENT_EMAIL_CONFLICT");

    // re-submitting one's own email is fine
    let (status, _) = send(
        &router,
        Method::PUT,
        &format!("/api/patients/{sam_id}"),
        Some(&json!({ "email": "sam@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_patient_is_not_found() {
    let (_module, router) = started_module().await;
    let id = uuid::Uuid::new_v4();

    for (method, body) in [
        (Method::GET, None),
        (Method::PUT, Some(json!({ "gender": "male" }))),
        (Method::DELETE, None),
    ] {
        let (status, problem) =
            send(&router, method.clone(), &format!("/api/patients/{id}"), body.as_ref()).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method}");
        assert_eq!(problem["code"], "PATIENT_NOT_FOUND");
        assert_eq!(problem["instance"], format!("/api/patients/{id}"));
    }
}
