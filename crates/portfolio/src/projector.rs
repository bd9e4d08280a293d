use crate::aggregate::aggregate_holdings;
use crate::error::ProjectorError;
use core_types::Transaction;
use database::TradeStore;
use futures::future::join_all;
use market_data::PriceOracle;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

/// One displayable position, priced when the oracle can resolve it.
#[derive(Debug, Clone, Serialize)]
pub struct Holding {
    pub symbol: String,
    pub shares: i64,
    /// Display name, when the oracle resolved the symbol.
    pub name: Option<String>,
    pub price: Option<Decimal>,
    /// `shares * price`, when priced.
    pub value: Option<Decimal>,
    /// Set when the oracle could not resolve the symbol right now. The
    /// holding itself is still real — it comes from the log, not the oracle.
    pub price_unavailable: bool,
}

/// Cash plus the market value of every priced holding.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioValuation {
    pub cash: Decimal,
    pub holdings_value: Decimal,
    pub total_value: Decimal,
    /// Symbols held but excluded from the total because no price was
    /// available.
    pub unpriced: Vec<String>,
}

/// Read-only derivation of current portfolio state for display.
pub struct PortfolioProjector {
    store: Arc<dyn TradeStore>,
    oracle: Arc<dyn PriceOracle>,
}

impl PortfolioProjector {
    pub fn new(store: Arc<dyn TradeStore>, oracle: Arc<dyn PriceOracle>) -> Self {
        Self { store, oracle }
    }

    /// Current holdings with live prices where available.
    ///
    /// Symbols whose signed sum is zero have been sold out and vanish from
    /// view. A symbol the oracle cannot resolve — not-found and transport
    /// failure read the same from here — is returned flagged rather than
    /// failing the call, so one provider gap cannot hide the rest of the
    /// portfolio. A negative sum means the ledger engine let an oversell
    /// through; that is logged and surfaced as a failure, never clamped.
    pub async fn holdings(&self, user_id: i64) -> Result<Vec<Holding>, ProjectorError> {
        let transactions = self.store.transactions(user_id).await?;
        let totals = aggregate_holdings(&transactions);

        if let Some((symbol, shares)) = totals.iter().find(|(_, shares)| **shares < 0) {
            tracing::error!(
                user_id,
                symbol = %symbol,
                shares,
                "aggregated holding is negative; the transaction log is inconsistent"
            );
            return Err(ProjectorError::NegativeHolding {
                symbol: symbol.clone(),
                shares: *shares,
            });
        }

        let lookups = totals
            .into_iter()
            .filter(|(_, shares)| *shares > 0)
            .map(|(symbol, shares)| async move {
                match self.oracle.lookup(&symbol).await {
                    Ok(Some(quote)) => Holding {
                        symbol,
                        shares,
                        name: Some(quote.name),
                        price: Some(quote.price),
                        value: Some(quote.price * Decimal::from(shares)),
                        price_unavailable: false,
                    },
                    Ok(None) | Err(_) => {
                        tracing::warn!(symbol = %symbol, "no quote for a held symbol");
                        Holding {
                            symbol,
                            shares,
                            name: None,
                            price: None,
                            value: None,
                            price_unavailable: true,
                        }
                    }
                }
            });

        Ok(join_all(lookups).await)
    }

    /// Cash balance plus the summed market value of resolvable holdings;
    /// unpriced holdings are excluded from the sum and reported separately.
    pub async fn total_value(&self, user_id: i64) -> Result<PortfolioValuation, ProjectorError> {
        let account = self.store.account(user_id).await?;
        let holdings = self.holdings(user_id).await?;

        let holdings_value: Decimal = holdings.iter().filter_map(|h| h.value).sum();
        let unpriced = holdings
            .iter()
            .filter(|h| h.price_unavailable)
            .map(|h| h.symbol.clone())
            .collect();

        Ok(PortfolioValuation {
            cash: account.cash,
            holdings_value,
            total_value: account.cash + holdings_value,
            unpriced,
        })
    }

    /// Full trade history, newest first; ties broken by insertion order.
    pub async fn history(&self, user_id: i64) -> Result<Vec<Transaction>, ProjectorError> {
        Ok(self.store.transactions(user_id).await?)
    }
}
