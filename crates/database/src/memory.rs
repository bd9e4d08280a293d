use crate::error::StoreError;
use crate::store::TradeStore;
use async_trait::async_trait;
use chrono::Utc;
use core_types::{Account, Transaction};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct State {
    next_user_id: i64,
    next_transaction_id: i64,
    accounts: HashMap<i64, Account>,
    transactions: Vec<Transaction>,
}

/// A [`TradeStore`] that lives entirely in process memory.
///
/// One async mutex around the whole state serializes every operation — a
/// stricter version of the per-user row lock the PostgreSQL backend takes,
/// which preserves the same atomicity guarantees. This is what the core test
/// suites run against; nothing about the ledger engine or projector knows
/// the difference.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently in the log. The atomicity tests use this to
    /// assert that rejected trades appended nothing.
    pub async fn transaction_count(&self) -> usize {
        self.state.lock().await.transactions.len()
    }
}

fn held_shares(state: &State, user_id: i64, symbol: &str) -> i64 {
    state
        .transactions
        .iter()
        .filter(|t| t.user_id == user_id && t.symbol == symbol)
        .map(|t| t.shares)
        .sum()
}

fn append(state: &mut State, user_id: i64, symbol: &str, shares: i64, price: Decimal) -> Transaction {
    state.next_transaction_id += 1;
    let transaction = Transaction {
        id: state.next_transaction_id,
        user_id,
        symbol: symbol.to_string(),
        shares,
        price,
        executed_at: Utc::now(),
    };
    state.transactions.push(transaction.clone());
    transaction
}

#[async_trait]
impl TradeStore for MemoryStore {
    async fn create_account(
        &self,
        username: &str,
        starting_cash: Decimal,
    ) -> Result<Account, StoreError> {
        let mut state = self.state.lock().await;

        if state.accounts.values().any(|a| a.username == username) {
            return Err(StoreError::UsernameTaken(username.to_string()));
        }

        state.next_user_id += 1;
        let account = Account {
            id: state.next_user_id,
            username: username.to_string(),
            cash: starting_cash,
        };
        state.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn account(&self, user_id: i64) -> Result<Account, StoreError> {
        self.state
            .lock()
            .await
            .accounts
            .get(&user_id)
            .cloned()
            .ok_or(StoreError::AccountNotFound(user_id))
    }

    async fn transactions(&self, user_id: i64) -> Result<Vec<Transaction>, StoreError> {
        let state = self.state.lock().await;
        let mut transactions: Vec<Transaction> = state
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        transactions.sort_by(|a, b| {
            b.executed_at
                .cmp(&a.executed_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(transactions)
    }

    async fn shares_held(&self, user_id: i64, symbol: &str) -> Result<i64, StoreError> {
        Ok(held_shares(&*self.state.lock().await, user_id, symbol))
    }

    async fn apply_purchase(
        &self,
        user_id: i64,
        symbol: &str,
        shares: i64,
        price: Decimal,
    ) -> Result<(Transaction, Decimal), StoreError> {
        let cost = price * Decimal::from(shares);
        let mut state = self.state.lock().await;

        let account = state
            .accounts
            .get_mut(&user_id)
            .ok_or(StoreError::AccountNotFound(user_id))?;
        if account.cash < cost {
            return Err(StoreError::InsufficientCash {
                required: cost,
                available: account.cash,
            });
        }

        account.cash -= cost;
        let balance = account.cash;
        let transaction = append(&mut state, user_id, symbol, shares, price);
        Ok((transaction, balance))
    }

    async fn apply_sale(
        &self,
        user_id: i64,
        symbol: &str,
        shares: i64,
        price: Decimal,
    ) -> Result<(Transaction, Decimal), StoreError> {
        let proceeds = price * Decimal::from(shares);
        let mut state = self.state.lock().await;

        let held = held_shares(&state, user_id, symbol);
        let account = state
            .accounts
            .get_mut(&user_id)
            .ok_or(StoreError::AccountNotFound(user_id))?;
        if held < shares {
            return Err(StoreError::InsufficientShares {
                requested: shares,
                held,
            });
        }

        account.cash += proceeds;
        let balance = account.cash;
        let transaction = append(&mut state, user_id, symbol, -shares, price);
        Ok((transaction, balance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn a_purchase_debits_cash_and_appends_one_row() {
        let store = MemoryStore::new();
        let user = store.create_account("alice", dec!(1000)).await.unwrap();

        let (transaction, balance) = store
            .apply_purchase(user.id, "AAPL", 4, dec!(100))
            .await
            .unwrap();

        assert_eq!(transaction.shares, 4);
        assert_eq!(balance, dec!(600));
        assert_eq!(store.account(user.id).await.unwrap().cash, dec!(600));
        assert_eq!(store.transaction_count().await, 1);
    }

    #[tokio::test]
    async fn a_rejected_purchase_changes_nothing() {
        let store = MemoryStore::new();
        let user = store.create_account("alice", dec!(50)).await.unwrap();

        let err = store
            .apply_purchase(user.id, "AAPL", 1, dec!(100))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::InsufficientCash { .. }));
        assert_eq!(store.account(user.id).await.unwrap().cash, dec!(50));
        assert_eq!(store.transaction_count().await, 0);
    }

    #[tokio::test]
    async fn a_sale_is_rejected_when_the_log_holds_too_few_shares() {
        let store = MemoryStore::new();
        let user = store.create_account("alice", dec!(1000)).await.unwrap();
        store
            .apply_purchase(user.id, "AAPL", 2, dec!(100))
            .await
            .unwrap();

        let err = store
            .apply_sale(user.id, "AAPL", 3, dec!(100))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::InsufficientShares {
                requested: 3,
                held: 2
            }
        ));
        assert_eq!(store.transaction_count().await, 1);
    }

    #[tokio::test]
    async fn duplicate_usernames_are_rejected() {
        let store = MemoryStore::new();
        store.create_account("alice", dec!(1000)).await.unwrap();

        let err = store.create_account("alice", dec!(1000)).await.unwrap_err();
        assert!(matches!(err, StoreError::UsernameTaken(_)));
    }

    #[tokio::test]
    async fn transactions_come_back_newest_first() {
        let store = MemoryStore::new();
        let user = store.create_account("alice", dec!(10000)).await.unwrap();
        for _ in 0..3 {
            store
                .apply_purchase(user.id, "AAPL", 1, dec!(10))
                .await
                .unwrap();
        }

        let transactions = store.transactions(user.id).await.unwrap();
        assert_eq!(transactions.len(), 3);
        for pair in transactions.windows(2) {
            let newer = &pair[0];
            let older = &pair[1];
            assert!(
                newer.executed_at > older.executed_at
                    || (newer.executed_at == older.executed_at && newer.id > older.id)
            );
        }
    }
}
