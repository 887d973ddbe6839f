//! Type-state operation builder.
//!
//! `register()` only exists once a handler and at least one response have been
//! declared, so an undocumented or handler-less route does not compile.

use std::marker::PhantomData;

use axum::{handler::Handler, http::Method, routing::MethodRouter, Router};

use crate::api::openapi::{
    ensure_schema, OpenApiRegistry, OperationSpec, ParamLocation, ParamSpec, RequestBodySpec,
    ResponseSpec,
};
use crate::api::problem::{Problem, APPLICATION_PROBLEM_JSON};

const APPLICATION_JSON: &str = "application/json";

#[derive(Debug, Clone, Copy)]
pub struct Missing;

#[derive(Debug, Clone, Copy)]
pub struct Present;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Missing {}
    impl Sealed for super::Present {}
}

/// Maps the handler state to what the builder holds: nothing, or a `MethodRouter<S>`.
pub trait HandlerSlot<S>: sealed::Sealed {
    type Slot;
}

impl<S> HandlerSlot<S> for Missing {
    type Slot = ();
}

impl<S> HandlerSlot<S> for Present {
    type Slot = MethodRouter<S>;
}

pub struct OperationBuilder<H, R, S = ()>
where
    H: HandlerSlot<S>,
{
    spec: OperationSpec,
    method_router: <H as HandlerSlot<S>>::Slot,
    _state: PhantomData<(H, R, fn() -> S)>,
}

impl<S> OperationBuilder<Missing, Missing, S> {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            spec: OperationSpec {
                method,
                path: path.into(),
                operation_id: None,
                summary: None,
                description: None,
                tags: Vec::new(),
                params: Vec::new(),
                request_body: None,
                responses: Vec::new(),
            },
            method_router: (),
            _state: PhantomData,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }
}

impl<H, R, S> OperationBuilder<H, R, S>
where
    H: HandlerSlot<S>,
{
    /// Inspect the spec (primarily for tests)
    pub fn spec(&self) -> &OperationSpec {
        &self.spec
    }

    pub fn operation_id(mut self, id: impl Into<String>) -> Self {
        self.spec.operation_id = Some(id.into());
        self
    }

    pub fn summary(mut self, text: impl Into<String>) -> Self {
        self.spec.summary = Some(text.into());
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.spec.description = Some(text.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.spec.tags.push(tag.into());
        self
    }

    /// Add a required `uuid` path parameter.
    pub fn uuid_path_param(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.spec.params.push(ParamSpec {
            name: name.into(),
            location: ParamLocation::Path,
            required: true,
            description: Some(description.into()),
            format: Some("uuid"),
        });
        self
    }

    /// Attach a required JSON request body and register its schema.
    pub fn json_request<T>(
        mut self,
        registry: &dyn OpenApiRegistry,
        desc: impl Into<String>,
    ) -> Self
    where
        T: utoipa::ToSchema + 'static,
    {
        let name = ensure_schema::<T>(registry);
        self.spec.request_body = Some(RequestBodySpec {
            content_type: APPLICATION_JSON,
            description: Some(desc.into()),
            schema_name: Some(name),
            required: true,
        });
        self
    }

    fn push_response(
        &mut self,
        status: u16,
        content_type: &'static str,
        description: String,
        schema_name: Option<String>,
        is_array: bool,
    ) {
        self.spec.responses.push(ResponseSpec {
            status,
            content_type,
            description,
            schema_name,
            is_array,
        });
    }

    fn with_response_state<R2>(self) -> OperationBuilder<H, R2, S> {
        OperationBuilder {
            spec: self.spec,
            method_router: self.method_router,
            _state: PhantomData,
        }
    }

    /// Response without a body (204).
    pub fn empty_response(
        mut self,
        status: u16,
        description: impl Into<String>,
    ) -> OperationBuilder<H, Present, S> {
        self.push_response(status, APPLICATION_JSON, description.into(), None, false);
        self.with_response_state()
    }

    /// JSON response whose body is `T`.
    pub fn json_response<T>(
        mut self,
        registry: &dyn OpenApiRegistry,
        status: u16,
        description: impl Into<String>,
    ) -> OperationBuilder<H, Present, S>
    where
        T: utoipa::ToSchema + 'static,
    {
        let name = ensure_schema::<T>(registry);
        self.push_response(status, APPLICATION_JSON, description.into(), Some(name), false);
        self.with_response_state()
    }

    /// JSON response whose body is an array of `T`.
    pub fn json_array_response<T>(
        mut self,
        registry: &dyn OpenApiRegistry,
        status: u16,
        description: impl Into<String>,
    ) -> OperationBuilder<H, Present, S>
    where
        T: utoipa::ToSchema + 'static,
    {
        let name = ensure_schema::<T>(registry);
        self.push_response(status, APPLICATION_JSON, description.into(), Some(name), true);
        self.with_response_state()
    }

    /// RFC 9457 `application/problem+json` response.
    pub fn problem_response(
        mut self,
        registry: &dyn OpenApiRegistry,
        status: u16,
        description: impl Into<String>,
    ) -> OperationBuilder<H, Present, S> {
        let name = ensure_schema::<Problem>(registry);
        self.push_response(
            status,
            APPLICATION_PROBLEM_JSON,
            description.into(),
            Some(name),
            false,
        );
        self.with_response_state()
    }
}

impl<R, S> OperationBuilder<Missing, R, S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn handler<F, T>(self, h: F) -> OperationBuilder<Present, R, S>
    where
        F: Handler<T, S> + Clone + Send + 'static,
        T: 'static,
    {
        let method_router = match self.spec.method {
            Method::POST => axum::routing::post(h),
            Method::PUT => axum::routing::put(h),
            Method::DELETE => axum::routing::delete(h),
            _ => axum::routing::get(h),
        };

        OperationBuilder {
            spec: self.spec,
            method_router,
            _state: PhantomData,
        }
    }
}

impl<S> OperationBuilder<Present, Present, S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Register the operation with the router and the OpenAPI registry.
    pub fn register(self, router: Router<S>, openapi: &dyn OpenApiRegistry) -> Router<S> {
        openapi.register_operation(&self.spec);
        router.route(&self.spec.path, self.method_router)
    }
}
