use core_types::CoreError;
use database::StoreError;
use market_data::OracleError;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    /// Malformed symbol or share quantity — the caller's fault, recoverable
    /// by resubmission.
    #[error(transparent)]
    Validation(#[from] CoreError),

    /// The oracle does not recognize the symbol. Same class as a validation
    /// failure from the caller's point of view.
    #[error("'{0}' is not a known ticker symbol")]
    UnknownSymbol(String),

    #[error("Not enough cash to cover the purchase. Required: {required}, Available: {available}")]
    InsufficientFunds { required: Decimal, available: Decimal },

    #[error("Not enough shares to cover the sale. Requested: {requested}, Held: {held}")]
    InsufficientShares { requested: i64, held: i64 },

    /// The oracle timed out or failed in transport. Transient; retrying is
    /// the caller's decision, never the engine's.
    #[error("Quote service is unavailable: {0}")]
    QuoteUnavailable(#[from] OracleError),

    #[error("Storage error: {0}")]
    Storage(StoreError),
}

impl From<StoreError> for LedgerError {
    /// The store re-verifies funds and shares under its per-user lock; its
    /// rejections are the same business rules, surfaced through the same
    /// variants.
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InsufficientCash {
                required,
                available,
            } => LedgerError::InsufficientFunds {
                required,
                available,
            },
            StoreError::InsufficientShares { requested, held } => {
                LedgerError::InsufficientShares { requested, held }
            }
            other => LedgerError::Storage(other),
        }
    }
}
