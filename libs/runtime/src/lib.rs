//! Process-level plumbing for the DPMS server: layered configuration, home
//! directory resolution, logging setup and shutdown signals.

pub mod config;
pub mod logging;
pub mod paths;
pub mod shutdown;

pub use config::{AppConfig, CliArgs, DatabaseConfig, LogSection, LoggingConfig, ServerConfig};
pub use logging::init_logging_from_config;
pub use paths::{resolve_home_dir, HomeDirError};
pub use shutdown::wait_for_shutdown;
