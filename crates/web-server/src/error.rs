use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use database::StoreError;
use ledger::LedgerError;
use portfolio::ProjectorError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Projector(#[from] ProjectorError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Oracle(#[from] market_data::OracleError),
    #[error(transparent)]
    Validation(#[from] core_types::CoreError),
    #[error("'{0}' is not a known ticker symbol")]
    UnknownSymbol(String),
}

/// Converts our custom `AppError` into an HTTP response.
///
/// Business rejections keep their messages — they are the user's to act on.
/// Storage and invariant failures are logged here and leave the process as an
/// opaque 500.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::UnknownSymbol(_) => (StatusCode::BAD_REQUEST, self.to_string()),

            AppError::Ledger(err) => match err {
                LedgerError::Validation(_)
                | LedgerError::UnknownSymbol(_)
                | LedgerError::InsufficientFunds { .. }
                | LedgerError::InsufficientShares { .. } => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                LedgerError::QuoteUnavailable(cause) => {
                    tracing::warn!(error = ?cause, "quote provider unavailable");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "The quote service is unavailable right now".to_string(),
                    )
                }
                LedgerError::Storage(StoreError::AccountNotFound(id)) => {
                    (StatusCode::NOT_FOUND, format!("No account exists with id {id}"))
                }
                LedgerError::Storage(cause) => {
                    tracing::error!(error = ?cause, "storage error during trade");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An internal storage error occurred".to_string(),
                    )
                }
            },

            AppError::Projector(err) => match err {
                ProjectorError::Storage(StoreError::AccountNotFound(id)) => {
                    (StatusCode::NOT_FOUND, format!("No account exists with id {id}"))
                }
                ProjectorError::Storage(cause) => {
                    tracing::error!(error = ?cause, "storage error during projection");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An internal storage error occurred".to_string(),
                    )
                }
                ProjectorError::NegativeHolding { .. } => {
                    // Already logged at error severity by the projector;
                    // nothing actionable for the caller.
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An internal consistency error occurred".to_string(),
                    )
                }
            },

            AppError::Store(StoreError::UsernameTaken(_)) => {
                (StatusCode::CONFLICT, self.to_string())
            }
            AppError::Store(StoreError::AccountNotFound(id)) => {
                (StatusCode::NOT_FOUND, format!("No account exists with id {id}"))
            }
            AppError::Store(cause) => {
                tracing::error!(error = ?cause, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal storage error occurred".to_string(),
                )
            }

            AppError::Oracle(cause) => {
                tracing::warn!(error = ?cause, "quote provider unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "The quote service is unavailable right now".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
