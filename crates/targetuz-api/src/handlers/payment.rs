//! Payment handlers - the escrow hold and release endpoints

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::dto::{HoldEscrowRequest, OrderResponse, ReleaseEscrowRequest, ReleaseResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// Debit the client's wallet and hold the amount against the order
pub async fn hold(
    State(state): State<Arc<AppState>>,
    Json(request): Json<HoldEscrowRequest>,
) -> ApiResult<Json<OrderResponse>> {
    request.validate()?;

    let order = state
        .engine
        .hold_escrow(
            request.order_id,
            request.client_id,
            request.amount,
            request.provider,
        )
        .await?;

    Ok(Json(order.into()))
}

/// Settle held funds to the specialist and the platform
pub async fn release(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReleaseEscrowRequest>,
) -> ApiResult<Json<ReleaseResponse>> {
    let outcome = state.engine.release_escrow(request.order_id).await?;
    Ok(Json(outcome.into()))
}
