use database::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProjectorError {
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// The signed sum for a symbol came out below zero. The ledger engine is
    /// supposed to make that impossible, so this is reported as a failure
    /// rather than clamped out of the view.
    #[error("Aggregated holdings for '{symbol}' are negative ({shares}); the transaction log is inconsistent")]
    NegativeHolding { symbol: String, shares: i64 },
}
