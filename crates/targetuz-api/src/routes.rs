//! API Routes

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;

/// Create API v1 routes
pub fn api_v1_routes() -> Router<Arc<AppState>> {
    Router::new()
        // General endpoints
        .route("/ping", get(handlers::health::ping))
        .route("/time", get(handlers::health::server_time))
        // Identity sync
        .route("/users", post(handlers::user::register))
        // Wallet routes
        .nest("/wallet", wallet_routes())
        // Order routes
        .nest("/orders", order_routes())
        // Escrow routes
        .nest("/payments", payment_routes())
}

fn wallet_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/topup", post(handlers::wallet::top_up))
        .route("/:user_id", get(handlers::wallet::balance))
        .route("/:user_id/history", get(handlers::wallet::history))
}

fn order_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::order::create))
        .route("/", get(handlers::order::list))
        .route("/:order_id", get(handlers::order::get))
        .route("/:order_id/transactions", get(handlers::order::transactions))
        .route("/:order_id/accept", post(handlers::order::accept))
        .route("/:order_id/cancel", post(handlers::order::cancel))
        .route("/:order_id/complete", post(handlers::order::complete))
}

fn payment_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/hold", post(handlers::payment::hold))
        .route("/release", post(handlers::payment::release))
}

/// Assemble the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api/v1", api_v1_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
