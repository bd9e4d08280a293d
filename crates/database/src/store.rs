use crate::error::StoreError;
use async_trait::async_trait;
use core_types::{Account, Transaction};
use rust_decimal::Decimal;

/// The storage seam handed to the ledger engine and the portfolio projector.
///
/// Implementations must uphold two guarantees: the transaction log is
/// append-only, and `apply_purchase`/`apply_sale` are atomic with respect to
/// other trades on the same user — the funds/shares precondition, the cash
/// change, and the appended row all happen under one per-user serialization,
/// or none of them happen.
#[async_trait]
pub trait TradeStore: Send + Sync {
    /// Provisions a new account with its starting cash balance.
    async fn create_account(
        &self,
        username: &str,
        starting_cash: Decimal,
    ) -> Result<Account, StoreError>;

    /// Fetches a single account record.
    async fn account(&self, user_id: i64) -> Result<Account, StoreError>;

    /// All of a user's transactions, newest first; ties broken by insertion
    /// order.
    async fn transactions(&self, user_id: i64) -> Result<Vec<Transaction>, StoreError>;

    /// Net shares of `symbol` currently held by `user_id`, aggregated from
    /// the log.
    async fn shares_held(&self, user_id: i64, symbol: &str) -> Result<i64, StoreError>;

    /// Atomically debits `price * shares` from the user's cash and appends a
    /// positive-quantity transaction. Fails with
    /// [`StoreError::InsufficientCash`] when the balance cannot cover the
    /// cost; the check runs under the same lock as the debit, so two
    /// concurrent purchases cannot both pass it against a stale balance.
    ///
    /// Returns the appended transaction and the new balance.
    async fn apply_purchase(
        &self,
        user_id: i64,
        symbol: &str,
        shares: i64,
        price: Decimal,
    ) -> Result<(Transaction, Decimal), StoreError>;

    /// Atomically credits `price * shares` to the user's cash and appends a
    /// negative-quantity transaction, re-verifying the held share count under
    /// the same lock. Fails with [`StoreError::InsufficientShares`] on a
    /// shortfall.
    ///
    /// Returns the appended transaction and the new balance.
    async fn apply_sale(
        &self,
        user_id: i64,
        symbol: &str,
        shares: i64,
        price: Decimal,
    ) -> Result<(Transaction, Decimal), StoreError>;
}
