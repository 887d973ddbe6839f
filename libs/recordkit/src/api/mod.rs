pub mod error;
pub mod openapi;
pub mod operation_builder;
pub mod problem;
pub mod rest;
pub mod routes;
