//! Process-wide catalog of tradable symbols
//!
//! Symbols come from the Finnhub symbol listing, are persisted to a CSV
//! snapshot, and are served from that snapshot while it is younger than 24h.

pub mod core;
pub mod infrastructure;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used types
pub use crate::core::{Catalog, CatalogService, Symbol, SymbolCache, TradingStatus};
pub use infrastructure::config::{CacheConfig, Config, FinnhubConfig};

use crate::core::cache::CacheError;
use thiserror::Error;

/// Main error type for catalog loading and access
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("HTTP error: {0}")]
    Http(u16),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Symbol catalog not initialized")]
    NotInitialized,
}

impl CatalogError {
    /// True for failures of the I/O class: cache file access and every
    /// stage of the remote fetch after the credential check.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Self::Cache(_) | Self::Http(_) | Self::Network(_) | Self::Parse(_)
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CatalogError>;
