use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to load environment variables for database connection: {0}")]
    ConnectionConfig(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("No account exists with id {0}")]
    AccountNotFound(i64),

    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("Not enough cash to cover the trade. Required: {required}, Available: {available}")]
    InsufficientCash { required: Decimal, available: Decimal },

    #[error("Not enough shares to cover the sale. Requested: {requested}, Held: {held}")]
    InsufficientShares { requested: i64, held: i64 },
}
