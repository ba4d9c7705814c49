//! Logger initialization.
//!
//! The engine logs through the `log` facade only; `env_logger` is installed
//! here as the backend.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
