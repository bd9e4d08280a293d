use crate::error::OracleError;
use crate::quote::Quote;
use crate::PriceOracle;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// A deterministic `PriceOracle` over a fixed table of quotes.
///
/// Stands in for the live provider in tests and offline runs, the same way a
/// simulated exchange stands in for a live one. Unknown symbols answer
/// `Ok(None)`, exactly like the HTTP implementation.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceOracle {
    quotes: HashMap<String, Quote>,
}

impl StaticPriceOracle {
    pub fn new(quotes: impl IntoIterator<Item = Quote>) -> Self {
        Self {
            quotes: quotes
                .into_iter()
                .map(|q| (q.symbol.to_uppercase(), q))
                .collect(),
        }
    }

    /// Convenience constructor from `(symbol, name, price)` triples.
    pub fn with_prices<'a>(prices: impl IntoIterator<Item = (&'a str, &'a str, Decimal)>) -> Self {
        Self::new(prices.into_iter().map(|(symbol, name, price)| Quote {
            symbol: symbol.to_string(),
            name: name.to_string(),
            price,
        }))
    }
}

#[async_trait]
impl PriceOracle for StaticPriceOracle {
    async fn lookup(&self, symbol: &str) -> Result<Option<Quote>, OracleError> {
        Ok(self.quotes.get(&symbol.to_uppercase()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn resolves_known_symbols_case_insensitively() {
        let oracle = StaticPriceOracle::with_prices([("AAPL", "Apple Inc.", dec!(187.50))]);

        let quote = oracle.lookup("aapl").await.unwrap().unwrap();
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.price, dec!(187.50));
    }

    #[tokio::test]
    async fn answers_none_for_unknown_symbols() {
        let oracle = StaticPriceOracle::with_prices([("AAPL", "Apple Inc.", dec!(187.50))]);

        assert!(oracle.lookup("ZZZZ").await.unwrap().is_none());
    }
}
