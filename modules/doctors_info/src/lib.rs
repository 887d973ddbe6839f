// === PUBLIC CONTRACT ===
pub mod contract;
pub use contract::model::{Doctor, DoctorPatch, NewDoctor};

// === MODULE DEFINITION ===
pub mod module;
pub use module::{DoctorsInfo, MODULE_NAME};

// === INTERNAL MODULES ===
// Exposed for integration tests; other crates should stick to `contract`.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
