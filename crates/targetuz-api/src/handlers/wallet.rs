//! Wallet handlers
//!
//! Balance reads always hit the database; the handler layer never caches a
//! balance between requests.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::dto::{BalanceResponse, HistoryQuery, TopUpRequest, TopUpResponse, TransactionRecord};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Credit a wallet from an external payment provider
pub async fn top_up(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TopUpRequest>,
) -> ApiResult<Json<TopUpResponse>> {
    request.validate()?;

    let receipt = state
        .engine
        .top_up(request.user_id, request.amount, request.provider)
        .await?;

    Ok(Json(TopUpResponse {
        user_id: receipt.user_id,
        wallet_id: receipt.wallet_id,
        balance: receipt.balance,
    }))
}

/// Current balance for a user (zero if no wallet exists yet)
pub async fn balance(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<BalanceResponse>> {
    let balance = state.db.wallet_repo().balance(user_id).await?;
    Ok(Json(BalanceResponse { user_id, balance }))
}

/// Ledger history for a user's wallet, newest first
pub async fn history(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<TransactionRecord>>> {
    let limit = query.limit.unwrap_or(100).clamp(1, 1000);
    let offset = query.offset.unwrap_or(0).max(0);

    let wallet = state
        .db
        .wallet_repo()
        .find_by_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No wallet for user {user_id}")))?;

    let rows = state
        .db
        .transaction_repo()
        .list_by_wallet(wallet.id, limit, offset)
        .await?;

    let records = rows
        .into_iter()
        .map(|row| row.into_domain().map(TransactionRecord::from))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(records))
}
