//! Immutable ticker -> Symbol lookup table
//!
//! Built once from a record stream and never mutated afterwards.
//! Tickers are trimmed, duplicates keep the first record seen, and
//! records without a ticker are dropped.

use crate::core::Symbol;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    symbols: HashMap<String, Symbol>,
}

impl Catalog {
    /// Build a catalog, first record wins on duplicate tickers
    pub fn from_symbols<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Symbol>,
    {
        let records = records.into_iter();
        let mut symbols = HashMap::with_capacity(records.size_hint().0);
        let mut duplicates = 0usize;
        let mut blank = 0usize;

        for mut symbol in records {
            if !symbol.has_ticker() {
                blank += 1;
                continue;
            }
            // Keys are stored trimmed whatever the record came from
            let ticker = symbol.ticker.trim();
            if ticker.len() != symbol.ticker.len() {
                symbol.ticker = ticker.to_string();
            }
            match symbols.entry(symbol.ticker.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(symbol);
                }
                Entry::Occupied(_) => duplicates += 1,
            }
        }

        if duplicates > 0 || blank > 0 {
            tracing::debug!(
                "Catalog built with {} symbols ({} duplicates, {} without ticker dropped)",
                symbols.len(),
                duplicates,
                blank
            );
        }

        Self { symbols }
    }

    #[inline]
    pub fn get(&self, ticker: &str) -> Option<&Symbol> {
        self.symbols.get(ticker)
    }

    #[inline]
    pub fn contains(&self, ticker: &str) -> bool {
        self.symbols.contains_key(ticker)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterate symbols in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }
}

impl FromIterator<Symbol> for Catalog {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        Self::from_symbols(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TradingStatus;
    use proptest::prelude::*;

    #[test]
    fn test_duplicate_ticker_keeps_first() {
        let catalog = Catalog::from_symbols(vec![
            Symbol::new("MSFT").with_name("MICROSOFT CORP"),
            Symbol::new("AAPL").with_name("APPLE INC"),
            Symbol::new("MSFT").with_name("MICROSOFT DUPLICATE"),
        ]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get("MSFT"),
            Some(&Symbol::new("MSFT").with_name("MICROSOFT CORP"))
        );
    }

    #[test]
    fn test_blank_ticker_excluded() {
        let catalog: Catalog = vec![
            Symbol::new(""),
            Symbol::new("  ").with_name("whitespace"),
            Symbol::new("AAPL").with_trading_status(TradingStatus::Trading),
        ]
        .into_iter()
        .collect();

        assert_eq!(catalog.len(), 1);
        assert!(catalog.contains("AAPL"));
        assert!(!catalog.contains(""));
    }

    #[test]
    fn test_padded_ticker_is_trimmed() {
        let catalog = Catalog::from_symbols(vec![
            Symbol::new(" AAPL ").with_name("APPLE INC"),
            Symbol::new("AAPL").with_name("APPLE DUPLICATE"),
        ]);

        assert_eq!(catalog.len(), 1);
        assert!(!catalog.contains(" AAPL "));
        assert_eq!(
            catalog.get("AAPL"),
            Some(&Symbol::new("AAPL").with_name("APPLE INC"))
        );
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let catalog = Catalog::from_symbols(vec![Symbol::new("AAPL")]);
        assert!(catalog.contains("AAPL"));
        assert!(catalog.get("aapl").is_none());
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert_eq!(catalog.tickers().count(), 0);
    }

    proptest! {
        #[test]
        fn prop_first_record_wins(
            records in proptest::collection::vec(("[A-C]{1,2}", 0u32..1000), 0..64)
        ) {
            let symbols: Vec<Symbol> = records
                .iter()
                .map(|(ticker, lot)| Symbol::new(ticker.clone()).with_lot_size(*lot))
                .collect();
            let catalog = Catalog::from_symbols(symbols);

            let mut expected: HashMap<&str, u32> = HashMap::new();
            for (ticker, lot) in &records {
                expected.entry(ticker.as_str()).or_insert(*lot);
            }

            prop_assert_eq!(catalog.len(), expected.len());
            for (ticker, lot) in expected {
                prop_assert_eq!(catalog.get(ticker).map(|s| s.lot_size), Some(lot));
            }
        }
    }
}
