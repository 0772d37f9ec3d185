//! Configuration management for the symbol catalog
//!
//! Loads configuration from config.toml at startup. The Finnhub API key
//! is never read from the file; it comes from `FINNHUB_TOKEN`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the Finnhub API key
pub const TOKEN_ENV: &str = "FINNHUB_TOKEN";

/// Catalog Configuration
///
/// Loaded from config.toml at startup. Every field has a default so an
/// absent or partial file is valid.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Remote provider settings
    #[serde(default)]
    pub finnhub: FinnhubConfig,

    /// Snapshot settings
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Finnhub API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FinnhubConfig {
    /// Provider base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Exchange code passed to the symbol listing
    #[serde(default = "default_exchange")]
    pub exchange: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// API key, injected from the environment
    #[serde(skip)]
    pub token: Option<String>,
}

/// Snapshot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Directory holding symbols.csv
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
}

impl Default for FinnhubConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            exchange: default_exchange(),
            timeout_secs: default_timeout_secs(),
            token: None,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
        }
    }
}

fn default_base_url() -> String {
    "https://finnhub.io".to_string()
}

fn default_exchange() -> String {
    "US".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("resources")
}

impl Config {
    /// Load configuration from config.toml file
    ///
    /// If the file doesn't exist, returns default configuration. The API
    /// key is taken from `FINNHUB_TOKEN`; blank counts as unset.
    /// # Errors
    /// Returns error if file exists but cannot be parsed or fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());

        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(contents) => Self::from_toml(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Config::default(),
            Err(e) => return Err(ConfigError::IoError(e)),
        };

        config.finnhub.token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty());
        Ok(config)
    }

    /// Parse and validate a TOML document
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.finnhub.base_url).map_err(|e| {
            ConfigError::InvalidValue(format!("finnhub.base_url {:?}: {}", self.finnhub.base_url, e))
        })?;
        if self.finnhub.exchange.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "finnhub.exchange must not be empty".to_string(),
            ));
        }
        if self.finnhub.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "finnhub.timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading file
    IoError(std::io::Error),
    /// Parse error (invalid TOML)
    ParseError(String),
    /// Well-formed but unusable value
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::ParseError(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::InvalidValue(e) => write!(f, "Invalid config value: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError(e) => Some(e),
            ConfigError::ParseError(_) | ConfigError::InvalidValue(_) => None,
        }
    }
}
