use crate::error::LedgerError;
use core_types::{validate, Transaction};
use database::TradeStore;
use market_data::{PriceOracle, Quote};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

/// The outcome of a recorded trade: the appended transaction and the cash
/// balance after it.
#[derive(Debug, Clone, Serialize)]
pub struct TradeReceipt {
    pub transaction: Transaction,
    pub balance: Decimal,
}

/// The invariant-preserving write path for trades.
///
/// Symbol and share quantity arrive as raw request text and are validated
/// before any oracle call or balance read, so rejections are deterministic
/// whether or not the provider is reachable. The price captured from the
/// oracle is read-only input — it is recorded with the trade and never
/// re-queried, which is why the lookup can stay outside the atomic step.
pub struct LedgerEngine {
    store: Arc<dyn TradeStore>,
    oracle: Arc<dyn PriceOracle>,
}

impl LedgerEngine {
    pub fn new(store: Arc<dyn TradeStore>, oracle: Arc<dyn PriceOracle>) -> Self {
        Self { store, oracle }
    }

    /// Buys shares at the oracle's current price.
    ///
    /// The store debits `price * shares` and appends the transaction under
    /// one per-user lock; a purchase that fails the funds check there leaves
    /// balance and log untouched.
    pub async fn record_purchase(
        &self,
        user_id: i64,
        symbol: &str,
        shares: &str,
    ) -> Result<TradeReceipt, LedgerError> {
        let symbol = validate::normalize_symbol(symbol)?;
        let shares = validate::parse_share_quantity(shares)?;

        let quote = self.quote(&symbol).await?;
        let (transaction, balance) = self
            .store
            .apply_purchase(user_id, &symbol, shares, quote.price)
            .await?;

        tracing::info!(
            user_id,
            symbol = %transaction.symbol,
            shares,
            price = %quote.price,
            "purchase recorded"
        );
        Ok(TradeReceipt {
            transaction,
            balance,
        })
    }

    /// Sells shares the user currently holds, at the oracle's current price.
    ///
    /// The held quantity is an aggregation over the transaction log, checked
    /// before the oracle is consulted so an oversell is rejected identically
    /// whether or not quotes are reachable. The store re-runs the same check
    /// under its per-user lock when it applies the trade.
    pub async fn record_sale(
        &self,
        user_id: i64,
        symbol: &str,
        shares: &str,
    ) -> Result<TradeReceipt, LedgerError> {
        let symbol = validate::normalize_symbol(symbol)?;
        let shares = validate::parse_share_quantity(shares)?;

        let held = self.store.shares_held(user_id, &symbol).await?;
        if held < shares {
            return Err(LedgerError::InsufficientShares {
                requested: shares,
                held,
            });
        }

        // A symbol with recorded holdings should resolve, but the provider's
        // symbol universe is not ours to guarantee.
        let quote = self.quote(&symbol).await?;
        let (transaction, balance) = self
            .store
            .apply_sale(user_id, &symbol, shares, quote.price)
            .await?;

        tracing::info!(
            user_id,
            symbol = %transaction.symbol,
            shares,
            price = %quote.price,
            "sale recorded"
        );
        Ok(TradeReceipt {
            transaction,
            balance,
        })
    }

    async fn quote(&self, symbol: &str) -> Result<Quote, LedgerError> {
        self.oracle
            .lookup(symbol)
            .await?
            .ok_or_else(|| LedgerError::UnknownSymbol(symbol.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use database::{MemoryStore, StoreError, TradeStore};
    use market_data::{OracleError, StaticPriceOracle};
    use rust_decimal_macros::dec;

    /// Fails every lookup the way an unreachable provider would.
    struct OfflineOracle;

    #[async_trait]
    impl PriceOracle for OfflineOracle {
        async fn lookup(&self, _symbol: &str) -> Result<Option<Quote>, OracleError> {
            Err(OracleError::Status(503))
        }
    }

    /// Proves a code path never consulted the oracle.
    struct PanickingOracle;

    #[async_trait]
    impl PriceOracle for PanickingOracle {
        async fn lookup(&self, _symbol: &str) -> Result<Option<Quote>, OracleError> {
            panic!("the oracle must not be consulted on this path");
        }
    }

    fn engine_with(store: Arc<MemoryStore>, oracle: impl PriceOracle + 'static) -> LedgerEngine {
        LedgerEngine::new(store, Arc::new(oracle))
    }

    async fn funded_account(store: &MemoryStore, cash: Decimal) -> i64 {
        store.create_account("alice", cash).await.unwrap().id
    }

    #[tokio::test]
    async fn a_purchase_debits_cost_and_records_one_positive_row() {
        let store = Arc::new(MemoryStore::new());
        let user = funded_account(&store, dec!(10000.00)).await;
        let engine = engine_with(
            store.clone(),
            StaticPriceOracle::with_prices([("X", "X Corp", dec!(50.00))]),
        );

        let receipt = engine.record_purchase(user, "X", "10").await.unwrap();

        assert_eq!(receipt.balance, dec!(9500.00));
        assert_eq!(receipt.transaction.shares, 10);
        assert_eq!(receipt.transaction.price, dec!(50.00));
        assert_eq!(store.account(user).await.unwrap().cash, dec!(9500.00));
        assert_eq!(store.transaction_count().await, 1);
    }

    #[tokio::test]
    async fn an_unaffordable_purchase_leaves_balance_and_log_untouched() {
        let store = Arc::new(MemoryStore::new());
        let user = funded_account(&store, dec!(100.00)).await;
        let engine = engine_with(
            store.clone(),
            StaticPriceOracle::with_prices([("X", "X Corp", dec!(50.00))]),
        );

        let err = engine.record_purchase(user, "X", "10").await.unwrap_err();

        assert!(matches!(
            err,
            LedgerError::InsufficientFunds { required, available }
                if required == dec!(500.00) && available == dec!(100.00)
        ));
        assert_eq!(store.account(user).await.unwrap().cash, dec!(100.00));
        assert_eq!(store.transaction_count().await, 0);
    }

    #[tokio::test]
    async fn an_oversell_is_rejected_with_no_state_change() {
        let store = Arc::new(MemoryStore::new());
        let user = funded_account(&store, dec!(10000.00)).await;
        let engine = engine_with(
            store.clone(),
            StaticPriceOracle::with_prices([("X", "X Corp", dec!(50.00))]),
        );
        engine.record_purchase(user, "X", "5").await.unwrap();
        let balance_before = store.account(user).await.unwrap().cash;

        let err = engine.record_sale(user, "X", "10").await.unwrap_err();

        assert!(matches!(
            err,
            LedgerError::InsufficientShares {
                requested: 10,
                held: 5
            }
        ));
        assert_eq!(store.account(user).await.unwrap().cash, balance_before);
        assert_eq!(store.transaction_count().await, 1);
    }

    #[tokio::test]
    async fn an_oversell_is_rejected_before_the_oracle_is_consulted() {
        let store = Arc::new(MemoryStore::new());
        let user = funded_account(&store, dec!(1000.00)).await;
        let engine = engine_with(store.clone(), PanickingOracle);

        let err = engine.record_sale(user, "X", "1").await.unwrap_err();

        assert!(matches!(
            err,
            LedgerError::InsufficientShares {
                requested: 1,
                held: 0
            }
        ));
    }

    #[tokio::test]
    async fn selling_out_credits_proceeds_at_the_current_price() {
        let store = Arc::new(MemoryStore::new());
        let user = funded_account(&store, dec!(10000.00)).await;

        // Price moves between the buy and the sell; each engine sees its own
        // snapshot of the market, the store sees both trades.
        let buyer = engine_with(
            store.clone(),
            StaticPriceOracle::with_prices([("X", "X Corp", dec!(20.00))]),
        );
        let seller = engine_with(
            store.clone(),
            StaticPriceOracle::with_prices([("X", "X Corp", dec!(25.00))]),
        );

        buyer.record_purchase(user, "X", "10").await.unwrap();
        let after_buy = store.account(user).await.unwrap().cash;
        let receipt = seller.record_sale(user, "X", "10").await.unwrap();

        assert_eq!(receipt.balance, after_buy + dec!(250.00));
        assert_eq!(receipt.transaction.shares, -10);
        assert_eq!(store.shares_held(user, "X").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn an_unknown_symbol_fails_the_purchase_with_no_state_change() {
        let store = Arc::new(MemoryStore::new());
        let user = funded_account(&store, dec!(10000.00)).await;
        let engine = engine_with(store.clone(), StaticPriceOracle::default());

        let err = engine.record_purchase(user, "X", "10").await.unwrap_err();

        assert!(matches!(err, LedgerError::UnknownSymbol(s) if s == "X"));
        assert_eq!(store.account(user).await.unwrap().cash, dec!(10000.00));
        assert_eq!(store.transaction_count().await, 0);
    }

    #[tokio::test]
    async fn buying_and_selling_back_at_a_fixed_price_conserves_cash() {
        let store = Arc::new(MemoryStore::new());
        let user = funded_account(&store, dec!(10000.00)).await;
        let engine = engine_with(
            store.clone(),
            StaticPriceOracle::with_prices([("X", "X Corp", dec!(123.45))]),
        );

        engine.record_purchase(user, "X", "7").await.unwrap();
        engine.record_sale(user, "X", "7").await.unwrap();

        assert_eq!(store.account(user).await.unwrap().cash, dec!(10000.00));
    }

    #[tokio::test]
    async fn malformed_input_never_reaches_the_oracle() {
        let store = Arc::new(MemoryStore::new());
        let user = funded_account(&store, dec!(10000.00)).await;
        let engine = engine_with(store.clone(), PanickingOracle);

        for shares in ["0", "-5", "2.5", "1e3", "", "ten", "+4"] {
            let err = engine.record_purchase(user, "X", shares).await.unwrap_err();
            assert!(matches!(err, LedgerError::Validation(_)), "shares={shares:?}");
        }

        let err = engine.record_purchase(user, "   ", "10").await.unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert_eq!(store.transaction_count().await, 0);
    }

    #[tokio::test]
    async fn an_oracle_outage_surfaces_as_quote_unavailable() {
        let store = Arc::new(MemoryStore::new());
        let user = funded_account(&store, dec!(10000.00)).await;
        let engine = engine_with(store.clone(), OfflineOracle);

        let err = engine.record_purchase(user, "X", "10").await.unwrap_err();

        assert!(matches!(err, LedgerError::QuoteUnavailable(_)));
        assert_eq!(store.transaction_count().await, 0);
    }

    #[tokio::test]
    async fn symbols_are_normalized_before_they_hit_the_log() {
        let store = Arc::new(MemoryStore::new());
        let user = funded_account(&store, dec!(10000.00)).await;
        let engine = engine_with(
            store.clone(),
            StaticPriceOracle::with_prices([("NFLX", "Netflix, Inc.", dec!(400.00))]),
        );

        let receipt = engine.record_purchase(user, " nflx ", "1").await.unwrap();

        assert_eq!(receipt.transaction.symbol, "NFLX");
        assert_eq!(store.shares_held(user, "NFLX").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn trades_against_a_missing_account_surface_as_storage_errors() {
        let store = Arc::new(MemoryStore::new());
        let engine = engine_with(
            store,
            StaticPriceOracle::with_prices([("X", "X Corp", dec!(50.00))]),
        );

        let err = engine.record_purchase(42, "X", "1").await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Storage(StoreError::AccountNotFound(42))
        ));
    }
}
