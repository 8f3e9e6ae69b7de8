//! User handlers

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::dto::{RegisterUserRequest, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// Register a user whose identity was validated upstream
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    request.validate()?;

    let user = state
        .db
        .user_repo()
        .create(&request.name, &request.email, request.role)
        .await?;

    tracing::info!(user_id = %user.id, role = %user.role, "User registered");
    Ok(Json(UserResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        created_at: user.created_at,
    }))
}
