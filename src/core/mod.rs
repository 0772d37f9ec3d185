//! Core catalog types and services
//!
//! - Symbol: one tradable instrument record
//! - Catalog: immutable ticker -> Symbol map
//! - SymbolCache: CSV snapshot on disk with a 24h freshness window
//! - FinnhubSource: remote symbol listing
//! - CatalogService: once-only load and publication

pub mod cache;
pub mod catalog;
pub mod discovery;
pub mod registry;
pub mod symbol;

pub use cache::{CacheError, SymbolCache, CACHE_FILE_NAME, CACHE_TTL};
pub use catalog::Catalog;
pub use discovery::{FinnhubSource, SymbolSource};
pub use registry::CatalogService;
pub use symbol::{Symbol, TradingStatus};
