use crate::{error::AppError, extract::AuthenticatedUser, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use core_types::{validate, Account, Transaction};
use ledger::TradeReceipt;
use market_data::Quote;
use portfolio::{Holding, PortfolioValuation};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub username: String,
}

/// Trade input exactly as the form submitted it; the ledger engine owns
/// validation.
#[derive(Debug, Deserialize)]
pub struct TradeRequest {
    pub symbol: String,
    pub shares: String,
}

/// # POST /api/accounts
/// Provisions an account with the configured starting cash.
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let account = state
        .store
        .create_account(request.username.trim(), state.starting_cash)
        .await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// # GET /api/quote/:symbol
pub async fn quote(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Quote>, AppError> {
    let symbol = validate::normalize_symbol(&symbol)?;
    let quote = state
        .oracle
        .lookup(&symbol)
        .await?
        .ok_or(AppError::UnknownSymbol(symbol))?;
    Ok(Json(quote))
}

/// # POST /api/buy
pub async fn buy(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Json(request): Json<TradeRequest>,
) -> Result<Json<TradeReceipt>, AppError> {
    let receipt = state
        .engine
        .record_purchase(user_id, &request.symbol, &request.shares)
        .await?;
    Ok(Json(receipt))
}

/// # POST /api/sell
pub async fn sell(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Json(request): Json<TradeRequest>,
) -> Result<Json<TradeReceipt>, AppError> {
    let receipt = state
        .engine
        .record_sale(user_id, &request.symbol, &request.shares)
        .await?;
    Ok(Json(receipt))
}

/// # GET /api/holdings
pub async fn holdings(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<Vec<Holding>>, AppError> {
    Ok(Json(state.projector.holdings(user_id).await?))
}

/// # GET /api/portfolio/value
pub async fn portfolio_value(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<PortfolioValuation>, AppError> {
    Ok(Json(state.projector.total_value(user_id).await?))
}

/// # GET /api/history
pub async fn history(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<Vec<Transaction>>, AppError> {
    Ok(Json(state.projector.history(user_id).await?))
}
