//! Process-wide symbol catalog
//!
//! Loads the catalog exactly once: from the CSV snapshot while it is
//! fresh, otherwise from the remote source followed by a best-effort
//! snapshot write. Once published the catalog is immutable and reads
//! are lock-free.

use crate::core::{Catalog, FinnhubSource, SymbolCache, SymbolSource};
use crate::infrastructure::config::Config;
use crate::{log_cache, log_discovery, CatalogError, Result};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::Level;

/// Global catalog service, installed only once it has loaded
static CATALOG_SERVICE: OnceCell<CatalogService<FinnhubSource>> = OnceCell::const_new();

/// Cache-or-fetch catalog loader with once-only publication
pub struct CatalogService<S> {
    cache: SymbolCache,
    source: S,
    catalog: OnceCell<Arc<Catalog>>,
}

impl<S: SymbolSource> CatalogService<S> {
    pub fn new(cache: SymbolCache, source: S) -> Self {
        Self {
            cache,
            source,
            catalog: OnceCell::new(),
        }
    }

    /// Load and publish the catalog if not done yet.
    ///
    /// Concurrent callers wait for the single in-flight load. A failed or
    /// cancelled load publishes nothing and the next call retries.
    pub async fn initialize(&self) -> Result<()> {
        if self.catalog.initialized() {
            return Ok(());
        }

        let mut fetched = false;
        let catalog = self
            .catalog
            .get_or_try_init(|| self.load(&mut fetched))
            .await?;

        // Only the loader that went remote persists, after publication
        if fetched {
            self.persist(catalog.clone()).await;
        }
        Ok(())
    }

    /// Published catalog. Never blocks and never touches disk or network.
    pub fn catalog(&self) -> Result<Arc<Catalog>> {
        self.catalog
            .get()
            .cloned()
            .ok_or(CatalogError::NotInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.catalog.initialized()
    }

    pub fn cache(&self) -> &SymbolCache {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    async fn load(&self, fetched: &mut bool) -> Result<Arc<Catalog>> {
        let cache = self.cache.clone();
        let cached =
            tokio::task::spawn_blocking(move || cache.is_fresh().then(|| cache.read())).await;

        match cached {
            Ok(Some(Ok(catalog))) => {
                log_cache!(
                    Level::INFO,
                    "Loaded {} symbols from cache {}",
                    catalog.len(),
                    self.cache.path().display()
                );
                return Ok(Arc::new(catalog));
            }
            Ok(Some(Err(e))) => {
                log_cache!(
                    Level::WARN,
                    "Cache {} unreadable, falling back to {}: {}",
                    self.cache.path().display(),
                    self.source.name(),
                    e
                );
            }
            Ok(None) => {
                log_cache!(
                    Level::INFO,
                    "Cache {} missing or stale, fetching from {}",
                    self.cache.path().display(),
                    self.source.name()
                );
            }
            Err(e) => {
                log_cache!(Level::WARN, "Cache probe task failed: {}", e);
            }
        }

        let symbols = self.source.fetch_symbols().await?;
        let catalog = Catalog::from_symbols(symbols);
        if catalog.is_empty() {
            log_discovery!(Level::WARN, "{} returned no symbols", self.source.name());
        }
        log_discovery!(
            Level::INFO,
            "Fetched {} symbols from {}",
            catalog.len(),
            self.source.name()
        );

        *fetched = true;
        Ok(Arc::new(catalog))
    }

    /// Best-effort snapshot write; failures are logged and dropped
    async fn persist(&self, catalog: Arc<Catalog>) {
        let cache = self.cache.clone();
        let count = catalog.len();

        match tokio::task::spawn_blocking(move || cache.write(&catalog)).await {
            Ok(Ok(())) => log_cache!(
                Level::INFO,
                "Wrote {} symbols to cache {}",
                count,
                self.cache.path().display()
            ),
            Ok(Err(e)) => log_cache!(
                Level::WARN,
                "Failed to write cache {}: {}",
                self.cache.path().display(),
                e
            ),
            Err(e) => log_cache!(Level::WARN, "Cache write task failed: {}", e),
        }
    }
}

impl CatalogService<FinnhubSource> {
    /// Build a Finnhub-backed service from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            SymbolCache::from_config(&config.cache),
            FinnhubSource::new(&config.finnhub)?,
        ))
    }

    /// Build and load the process-wide service, then install it.
    ///
    /// Nothing is installed until a load succeeds, so a failed call can be
    /// retried with a corrected `config`. Once installed, `config` is ignored.
    pub async fn global(config: &Config) -> Result<&'static Self> {
        CATALOG_SERVICE
            .get_or_try_init(|| async {
                let service = Self::from_config(config)?;
                service.initialize().await?;
                Ok(service)
            })
            .await
    }

    pub fn try_global() -> Option<&'static Self> {
        CATALOG_SERVICE.get()
    }
}

/// Initialize the process-wide catalog
pub async fn initialize(config: &Config) -> Result<()> {
    CatalogService::global(config).await.map(|_| ())
}

/// Process-wide catalog, available after a successful [`initialize`]
pub fn catalog() -> Result<Arc<Catalog>> {
    CatalogService::try_global()
        .ok_or(CatalogError::NotInitialized)?
        .catalog()
}
