//! HTTP host for the record modules.
//!
//! Modules register their routes against a router prepared here and describe
//! each operation through [`recordkit::OpenApiRegistry`]. `rest_finalize`
//! publishes the collected operations as `/openapi.json` and wraps the whole
//! router in the shared middleware stack; `serve` runs it until cancelled.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use arc_swap::ArcSwap;
use async_trait::async_trait;
use axum::http::header;
use axum::response::IntoResponse;
use axum::{middleware::from_fn, routing::get, Router};
use parking_lot::Mutex;
use recordkit::{ModuleCtx, OpenApiRegistry, OperationSpec, SchemaCollection};
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};
use utoipa::openapi::{schema::Schema, RefOr};

mod config;
mod openapi;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;

pub const MODULE_NAME: &str = "api_ingress";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ApiIngress {
    config: ArcSwap<ApiIngressConfig>,
    request_timeout: Duration,
    // keyed by (path, method) so the document comes out in a stable order
    operation_specs: Mutex<BTreeMap<(String, String), OperationSpec>>,
    schemas: Mutex<BTreeMap<String, RefOr<Schema>>>,
    final_router: Mutex<Option<Router>>,
}

impl Default for ApiIngress {
    fn default() -> Self {
        Self::new(ApiIngressConfig::default())
    }
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            operation_specs: Mutex::new(BTreeMap::new()),
            schemas: Mutex::new(BTreeMap::new()),
            final_router: Mutex::new(None),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn get_config(&self) -> ApiIngressConfig {
        (**self.config.load()).clone()
    }

    pub fn operation_count(&self) -> usize {
        self.operation_specs.lock().len()
    }

    /// Base router with the host's own endpoints.
    pub fn rest_prepare(&self, router: Router) -> Result<Router> {
        tracing::debug!("REST host prepared base router with health check");
        Ok(router.route("/health", get(web::health_check)))
    }

    /// Serialize the current registry contents as an OpenAPI document.
    pub fn build_openapi(&self) -> Result<serde_json::Value> {
        let specs = self.operation_specs.lock();
        let components = openapi::Components {
            schemas: self.schemas.lock().clone(),
        };
        tracing::info!(operations = specs.len(), "Building OpenAPI document");
        let doc = openapi::build_document(specs.values(), components);
        Ok(serde_json::to_value(doc)?)
    }

    /// Add docs endpoints, the problem fallback and the middleware stack.
    /// The result is also kept for [`ApiIngress::serve`].
    pub fn rest_finalize(&self, mut router: Router) -> Result<Router> {
        let config = self.get_config();

        if config.enable_docs {
            // Built once; served as static JSON
            let document = Arc::new(self.build_openapi()?);
            router = router
                .route(
                    "/openapi.json",
                    get(move || {
                        let doc = document.clone();
                        async move {
                            (
                                [(header::CACHE_CONTROL, "no-store")],
                                axum::Json((*doc).clone()),
                            )
                                .into_response()
                        }
                    }),
                )
                .route("/docs", get(web::serve_docs));
        }

        router = router.fallback(web::route_not_found);

        // `layer` wraps everything added before it, so the first layer here is
        // the innermost: BodyLimit < CORS < Timeout < request id < Trace < Propagate < SetRequestId.
        router = router.layer(RequestBodyLimitLayer::new(config.body_limit_bytes));
        if config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }
        router = router.layer(TimeoutLayer::new(self.request_timeout));
        router = router.layer(from_fn(request_id::record_request_id));
        router = router.layer(request_id::trace_layer());

        let x_request_id = request_id::header();
        router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
        router = router.layer(SetRequestIdLayer::new(
            x_request_id,
            request_id::NanoRequestId,
        ));

        *self.final_router.lock() = Some(router.clone());
        tracing::debug!("REST host finalized router");
        Ok(router)
    }

    /// Bind `bind_addr` and serve the finalized router until `cancel` fires.
    pub async fn serve(self: Arc<Self>, cancel: CancellationToken) -> Result<()> {
        let cfg = self.get_config();
        let addr: SocketAddr = cfg
            .bind_addr
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address '{}': {}", cfg.bind_addr, e))?;

        let stored = { self.final_router.lock().take() };
        let router = match stored {
            Some(r) => r,
            None => {
                tracing::debug!("No finalized router, finalizing an empty one");
                let base = self.rest_prepare(Router::new())?;
                self.rest_finalize(base)?
            }
        };

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(%addr, "HTTP server listening");

        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully");
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}

#[async_trait]
impl recordkit::Module for ApiIngress {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    async fn init(&self, ctx: &ModuleCtx) -> Result<()> {
        let current = self.config.load();
        let cfg = ctx
            .module_config::<ApiIngressConfig>()
            .with_default_bind(&current.bind_addr);
        tracing::debug!(bind_addr = %cfg.bind_addr, docs = cfg.enable_docs, "api_ingress configured");
        self.config.store(Arc::new(cfg));
        Ok(())
    }
}

impl OpenApiRegistry for ApiIngress {
    fn register_operation(&self, spec: &OperationSpec) {
        let key = (spec.path.clone(), spec.method.as_str().to_string());
        let mut specs = self.operation_specs.lock();
        if specs.contains_key(&key) {
            // First registration wins; a second one is a wiring bug.
            tracing::error!(
                method = %spec.method,
                path = %spec.path,
                "Duplicate (method, path) detected; ignoring subsequent registration"
            );
            return;
        }
        specs.insert(key, spec.clone());
        tracing::debug!(
            method = %spec.method,
            path = %spec.path,
            operation_id = spec.operation_id.as_deref().unwrap_or("-"),
            total = specs.len(),
            "Registered API operation"
        );
    }

    fn ensure_schema_raw(&self, name: &str, schemas: SchemaCollection) -> String {
        let mut registered = self.schemas.lock();
        for (key, schema) in schemas {
            registered.entry(key).or_insert(schema);
        }
        name.to_string()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
