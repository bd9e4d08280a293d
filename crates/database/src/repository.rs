use crate::error::StoreError;
use crate::store::TradeStore;
use async_trait::async_trait;
use core_types::{Account, Transaction};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, Postgres};

/// The PostgreSQL-backed [`TradeStore`]. It encapsulates all SQL queries and
/// data access logic; nothing outside this type talks to the database
/// directly.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Locks the user's account row and returns its cash balance.
    ///
    /// Every trade takes this lock before reading anything else. It is what
    /// serializes concurrent trades for one user — other users' rows stay
    /// untouched, so there is no cross-user contention.
    async fn lock_account(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        user_id: i64,
    ) -> Result<Decimal, StoreError> {
        let cash: Option<Decimal> =
            sqlx::query_scalar("SELECT cash FROM users WHERE id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut **tx)
                .await?;

        cash.ok_or(StoreError::AccountNotFound(user_id))
    }

    async fn set_cash(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        user_id: i64,
        cash: Decimal,
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET cash = $1 WHERE id = $2")
            .bind(cash)
            .bind(user_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Appends one signed-quantity row to the transaction log. The id and
    /// timestamp are assigned by the database at insertion.
    async fn append_transaction(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        user_id: i64,
        symbol: &str,
        shares: i64,
        price: Decimal,
    ) -> Result<Transaction, StoreError> {
        let transaction = sqlx::query_as::<_, Transaction>(
            "INSERT INTO transactions (user_id, symbol, shares, price) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, user_id, symbol, shares, price, executed_at",
        )
        .bind(user_id)
        .bind(symbol)
        .bind(shares)
        .bind(price)
        .fetch_one(&mut **tx)
        .await?;

        Ok(transaction)
    }
}

#[async_trait]
impl TradeStore for DbRepository {
    async fn create_account(
        &self,
        username: &str,
        starting_cash: Decimal,
    ) -> Result<Account, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            "INSERT INTO users (username, cash) VALUES ($1, $2) \
             RETURNING id, username, cash",
        )
        .bind(username)
        .bind(starting_cash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::UsernameTaken(username.to_string())
            }
            _ => StoreError::Database(e),
        })?;

        tracing::info!(user_id = account.id, username, "account created");
        Ok(account)
    }

    async fn account(&self, user_id: i64) -> Result<Account, StoreError> {
        sqlx::query_as::<_, Account>("SELECT id, username, cash FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::AccountNotFound(user_id))
    }

    async fn transactions(&self, user_id: i64) -> Result<Vec<Transaction>, StoreError> {
        let transactions = sqlx::query_as::<_, Transaction>(
            "SELECT id, user_id, symbol, shares, price, executed_at \
             FROM transactions WHERE user_id = $1 \
             ORDER BY executed_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    async fn shares_held(&self, user_id: i64, symbol: &str) -> Result<i64, StoreError> {
        let held: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(shares), 0)::BIGINT \
             FROM transactions WHERE user_id = $1 AND symbol = $2",
        )
        .bind(user_id)
        .bind(symbol)
        .fetch_one(&self.pool)
        .await?;

        Ok(held)
    }

    async fn apply_purchase(
        &self,
        user_id: i64,
        symbol: &str,
        shares: i64,
        price: Decimal,
    ) -> Result<(Transaction, Decimal), StoreError> {
        let cost = price * Decimal::from(shares);

        let mut tx = self.pool.begin().await?;
        let cash = Self::lock_account(&mut tx, user_id).await?;

        if cash < cost {
            // Dropping `tx` rolls everything back.
            return Err(StoreError::InsufficientCash {
                required: cost,
                available: cash,
            });
        }

        let balance = cash - cost;
        Self::set_cash(&mut tx, user_id, balance).await?;
        let transaction = Self::append_transaction(&mut tx, user_id, symbol, shares, price).await?;
        tx.commit().await?;

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

        let mut tx = self.pool.begin().await?;
        // Lock first: the aggregation below is only trustworthy while no
        // other trade for this user can commit.
        let cash = Self::lock_account(&mut tx, user_id).await?;

        let held: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(shares), 0)::BIGINT \
             FROM transactions WHERE user_id = $1 AND symbol = $2",
        )
        .bind(user_id)
        .bind(symbol)
        .fetch_one(&mut *tx)
        .await?;

        if held < shares {
            return Err(StoreError::InsufficientShares {
                requested: shares,
                held,
            });
        }

        let balance = cash + proceeds;
        Self::set_cash(&mut tx, user_id, balance).await?;
        let transaction =
            Self::append_transaction(&mut tx, user_id, symbol, -shares, price).await?;
        tx.commit().await?;

        Ok((transaction, balance))
    }
}
