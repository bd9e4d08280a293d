use crate::enums::TradeSide;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the append-only trade log.
///
/// Rows are never updated or deleted; every balance and holding in the
/// system is re-derived from them. `shares` is signed: positive for a buy,
/// negative for a sell.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    /// Normalized uppercase ticker.
    pub symbol: String,
    pub shares: i64,
    /// Price observed when the trade executed; never re-queried afterwards.
    pub price: Decimal,
    pub executed_at: DateTime<Utc>,
}

impl Transaction {
    /// Which side of the trade this row records, read off the sign of `shares`.
    pub fn side(&self) -> TradeSide {
        TradeSide::from_shares(self.shares)
    }

    /// Cash moved by this trade: `|shares| * price`.
    pub fn gross_value(&self) -> Decimal {
        self.price * Decimal::from(self.shares.abs())
    }
}

/// A user's account record.
///
/// Credentials live with the auth gateway in front of this service; the only
/// thing owned here is the cash balance, and only the ledger engine may
/// change it.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub cash: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(shares: i64) -> Transaction {
        Transaction {
            id: 1,
            user_id: 1,
            symbol: "AAPL".to_string(),
            shares,
            price: dec!(150.25),
            executed_at: Utc::now(),
        }
    }

    #[test]
    fn side_follows_the_sign_of_shares() {
        assert_eq!(row(10).side(), TradeSide::Buy);
        assert_eq!(row(-10).side(), TradeSide::Sell);
    }

    #[test]
    fn gross_value_ignores_the_sign() {
        assert_eq!(row(4).gross_value(), dec!(601.00));
        assert_eq!(row(-4).gross_value(), dec!(601.00));
    }
}
