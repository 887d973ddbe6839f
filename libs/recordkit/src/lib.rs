//! # RecordKit - generic entity record services
//!
//! Shared building blocks for the record modules (doctors, patients):
//!
//! - **Kind descriptor**: [`RecordKind`] names the payload shapes of one entity
//!   kind and carries its mapper functions.
//! - **Validation**: declarative per-field rule tables consumed by [`validate`].
//! - **Store port**: [`RecordStore`] plus an in-memory reference implementation.
//! - **Lifecycle manager**: [`Service`], one generic create/read/update/delete
//!   implementation parameterized by kind.
//! - **REST surface**: generic handlers, route registration and RFC 9457 problems.
//! - **Module contracts**: init → migrate → register REST phases used by the server.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use recordkit::{InMemoryStore, Service, ServiceConfig};
//!
//! let store = Arc::new(InMemoryStore::<DoctorKind>::new());
//! let service = Service::new(store, ServiceConfig::default());
//! let doctor = service.create(new_doctor).await?;
//! ```

pub use anyhow::Result;
pub use async_trait::async_trait;

pub mod api;
pub mod context;
pub mod contracts;
pub mod error;
pub mod kind;
pub mod memory;
pub mod repo;
pub mod service;
pub mod validation;

pub use api::openapi::{ensure_schema, OpenApiRegistry, OperationSpec, SchemaCollection};
pub use api::problem::{Problem, ProblemResponse, APPLICATION_PROBLEM_JSON};
pub use api::rest::{null_as_empty, RestKind};
pub use api::routes::register_routes;
pub use context::{ConfigProvider, ModuleCtx, ModuleCtxBuilder};
pub use contracts::{DbModule, Module, RecordModule, RestfulModule};
pub use error::RecordError;
pub use kind::RecordKind;
pub use memory::InMemoryStore;
pub use repo::{RecordStore, StoreError};
pub use service::{Service, ServiceConfig};
pub use validation::{validate, validate_at, FieldErrors, FieldRules, FieldValue, Rule, Validate};
