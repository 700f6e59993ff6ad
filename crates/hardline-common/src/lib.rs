//! Hardline Common - shared logging and configuration

pub mod config;
pub mod logging;

pub use config::{Config, JournalConfig, LoggingConfig, PolicyConfig};
pub use logging::{init_logging, init_logging_with_config, LogConfig, LogFormat};
