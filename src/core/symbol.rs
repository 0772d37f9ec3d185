//! Tradable instrument record
//!
//! One `Symbol` per ticker. Fields the provider does not supply stay at
//! their defaults: `None` for optional text, zero for sizes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Current trading state of a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradingStatus {
    /// Actively trading
    Trading,
    /// Temporarily halted
    Halted,
    /// Closed for the day
    Closed,
}

impl TradingStatus {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Trading => "TRADING",
            Self::Halted => "HALTED",
            Self::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for TradingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradingStatus {
    type Err = UnknownTradingStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TRADING" => Ok(Self::Trading),
            "HALTED" => Ok(Self::Halted),
            "CLOSED" => Ok(Self::Closed),
            other => Err(UnknownTradingStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown trading status: {0:?}")]
pub struct UnknownTradingStatus(pub String);

/// Symbol record keyed by ticker
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Symbol {
    pub ticker: String,
    pub name: Option<String>,
    pub lot_size: u32,
    pub tick_size: f64,
    pub trading_status: Option<TradingStatus>,
}

impl Symbol {
    /// Create a symbol with only its ticker set
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            name: None,
            lot_size: 0,
            tick_size: 0.0,
            trading_status: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_lot_size(mut self, lot_size: u32) -> Self {
        self.lot_size = lot_size;
        self
    }

    pub fn with_tick_size(mut self, tick_size: f64) -> Self {
        self.tick_size = tick_size;
        self
    }

    pub fn with_trading_status(mut self, status: TradingStatus) -> Self {
        self.trading_status = Some(status);
        self
    }

    /// Records without a usable ticker never enter a catalog
    #[inline]
    pub fn has_ticker(&self) -> bool {
        !self.ticker.trim().is_empty()
    }
}

/// Map empty or whitespace-only text to `None`
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
