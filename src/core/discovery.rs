//! Symbol Discovery (Cold Path)
//!
//! Fetches the full list of symbols traded on US exchanges from the
//! Finnhub REST API. Called at most once per process, and only when the
//! on-disk snapshot is missing or stale.

use crate::core::symbol::non_empty;
use crate::core::{Symbol, TradingStatus};
use crate::infrastructure::config::FinnhubConfig;
use crate::{log_discovery, CatalogError, Result};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::Level;
use url::Url;

/// Header carrying the Finnhub API key
pub const TOKEN_HEADER: &str = "X-Finnhub-Token";

/// Symbol listing path, relative to the provider base URL
pub const SYMBOL_PATH: &str = "/api/v1/stock/symbol";

/// Source of raw symbol records
///
/// # Design Notes
/// - Generic seam so the catalog service is monomorphized per source
/// - Returned records may contain duplicates and blank tickers; the
///   catalog resolves both
pub trait SymbolSource: Send + Sync {
    /// Source name (for logging)
    fn name(&self) -> &'static str;

    /// Fetch the full symbol listing
    fn fetch_symbols(&self) -> impl Future<Output = Result<Vec<Symbol>>> + Send;
}

/// Finnhub symbol listing client
pub struct FinnhubSource {
    client: reqwest::Client,
    endpoint: Url,
    token: Option<String>,
}

impl FinnhubSource {
    /// Create a client for the configured provider and exchange.
    ///
    /// # Errors
    /// Returns `Configuration` if the base URL cannot be parsed.
    pub fn new(config: &FinnhubConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("symbol-catalog/0.1")
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Ok(Self {
            client,
            endpoint: symbol_endpoint(&config.base_url, &config.exchange)?,
            token: config.token.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                CatalogError::Configuration(
                    "Required environment variable FINNHUB_TOKEN is not set".to_string(),
                )
            })
    }
}

impl SymbolSource for FinnhubSource {
    fn name(&self) -> &'static str {
        "finnhub"
    }

    /// API: GET {base}/api/v1/stock/symbol?exchange=US
    async fn fetch_symbols(&self) -> Result<Vec<Symbol>> {
        // Credential check precedes any network access
        let token = self.token()?;

        log_discovery!(Level::INFO, "Fetching symbols from {}", self.endpoint);

        let response = self
            .client
            .get(self.endpoint.clone())
            .header(TOKEN_HEADER, token)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(CatalogError::Http(response.status().as_u16()));
        }

        let records = response
            .json::<Vec<FinnhubSymbol>>()
            .await
            .map_err(|e| {
                if e.is_decode() {
                    CatalogError::Parse(e.to_string())
                } else {
                    CatalogError::Network(e.to_string())
                }
            })?;

        log_discovery!(Level::INFO, "Received {} symbols from Finnhub", records.len());

        Ok(records.into_iter().map(Symbol::from).collect())
    }
}

/// Build `{base}/api/v1/stock/symbol?exchange={exchange}`
fn symbol_endpoint(base_url: &str, exchange: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)
        .and_then(|base| base.join(SYMBOL_PATH))
        .map_err(|e| CatalogError::Configuration(format!("invalid base URL {:?}: {}", base_url, e)))?;
    url.query_pairs_mut().append_pair("exchange", exchange);
    Ok(url)
}

// === API Response Types ===

/// Finnhub stock symbol record
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinnhubSymbol {
    #[serde(default)]
    display_symbol: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    lot_size: Option<u32>,
    #[serde(default)]
    tick_size: Option<f64>,
    #[serde(default, deserialize_with = "blank_status")]
    trading_status: Option<TradingStatus>,
}

impl From<FinnhubSymbol> for Symbol {
    fn from(raw: FinnhubSymbol) -> Self {
        Self {
            ticker: raw.display_symbol,
            name: non_empty(raw.description),
            lot_size: raw.lot_size.unwrap_or(0),
            tick_size: raw.tick_size.unwrap_or(0.0),
            trading_status: raw.trading_status,
        }
    }
}

/// Empty status string deserializes as absent
fn blank_status<'de, D>(deserializer: D) -> std::result::Result<Option<TradingStatus>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match non_empty(raw) {
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
