use axum::{
    http::{StatusCode, Uri},
    response::{Html, Json},
};
use recordkit::ProblemResponse;
use serde_json::{json, Value};

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Problem response for paths no module serves.
pub async fn route_not_found(uri: Uri) -> ProblemResponse {
    recordkit::api::error::from_parts(
        StatusCode::NOT_FOUND,
        "ROUTE_NOT_FOUND",
        "Not Found",
        format!("No route for {}", uri.path()),
        uri.path(),
    )
}

/// Stoplight Elements viewer for `/openapi.json`, loaded from the CDN.
pub async fn serve_docs() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>DPMS API</title>
  <script src="https://unpkg.com/@stoplight/elements@latest/web-components.min.js"></script>
  <link rel="stylesheet" href="https://unpkg.com/@stoplight/elements@latest/styles.min.css">
</head>
<body>
  <elements-api apiDescriptionUrl="/openapi.json" router="hash" layout="sidebar"></elements-api>
</body>
</html>"#,
    )
}
