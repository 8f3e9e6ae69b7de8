//! Order handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use targetuz_types::{NewOrder, OrderStatus};

use crate::dto::{
    ActorPayload, CompletionResponse, CreateOrderRequest, ListOrdersQuery, OrderResponse,
    TransactionRecord,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Create a pending order from a client to a specialist
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateOrderRequest>,
) -> ApiResult<Json<OrderResponse>> {
    let new_order: NewOrder = request.into();
    new_order.validate()?;

    let row = state.db.order_repo().create(&new_order).await?;
    let order = row.into_domain()?;

    tracing::info!(order_id = %order.id, client_id = %order.client_id, "Order created");
    Ok(Json(order.into()))
}

/// Fetch one order
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<Uuid>,
) -> ApiResult<Json<OrderResponse>> {
    let row = state
        .db
        .order_repo()
        .find_by_id(order_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Order {order_id} not found")))?;

    Ok(Json(row.into_domain()?.into()))
}

/// Orders where the user participates as client or specialist
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListOrdersQuery>,
) -> ApiResult<Json<Vec<OrderResponse>>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let offset = query.offset.unwrap_or(0).max(0);

    let rows = state
        .db
        .order_repo()
        .list_for_user(query.user_id, limit, offset)
        .await?;

    let orders = rows
        .into_iter()
        .map(|row| row.into_domain().map(OrderResponse::from))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(orders))
}

/// Ledger entries referencing an order, for reconciliation views
pub async fn transactions(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<Uuid>,
) -> ApiResult<Json<Vec<TransactionRecord>>> {
    let rows = state.db.transaction_repo().list_by_order(order_id).await?;
    let records = rows
        .into_iter()
        .map(|row| row.into_domain().map(TransactionRecord::from))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(records))
}

/// Specialist (or admin) takes the engagement
pub async fn accept(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<Uuid>,
    Json(actor): Json<ActorPayload>,
) -> ApiResult<Json<OrderResponse>> {
    let order = state
        .engine
        .transition_order(order_id, actor.into(), OrderStatus::Accepted)
        .await?;
    Ok(Json(order.into()))
}

/// Specialist (or admin) declines the engagement
pub async fn cancel(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<Uuid>,
    Json(actor): Json<ActorPayload>,
) -> ApiResult<Json<OrderResponse>> {
    let order = state
        .engine
        .transition_order(order_id, actor.into(), OrderStatus::Cancelled)
        .await?;
    Ok(Json(order.into()))
}

/// Complete the order and settle its escrow if any is held
///
/// A deferred settlement is reported in the body, not as a failure; the
/// caller retries the release endpoint once the cause clears.
pub async fn complete(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<Uuid>,
    Json(actor): Json<ActorPayload>,
) -> ApiResult<Json<CompletionResponse>> {
    let outcome = state.engine.complete_order(order_id, actor.into()).await?;
    Ok(Json(outcome.into()))
}
