//! Infrastructure - cold path only
//!
//! - Configuration management
//! - Logging

pub mod config;
pub mod logging;

pub use config::{CacheConfig, Config, ConfigError, FinnhubConfig};
pub use logging::init_logging;
