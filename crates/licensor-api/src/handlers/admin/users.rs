//! Admin user management handlers.

use axum::Json;
use axum::extract::State;

use licensor_entity::user::UserStatus;
use licensor_service::{CreateUserRequest, CreatedUser, UserSummary};

use crate::dto::request::{ResetPasswordRequest, SetStatusRequest};
use crate::dto::response::{ApiResponse, UnbindResponse};
use crate::error::ApiError;
use crate::extractors::{ApiJson, UserIdPath};
use crate::state::AppState;

/// POST /api/admin/users
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<Json<ApiResponse<CreatedUser>>, ApiError> {
    let created = state.admin_users.create_user(req).await?;
    Ok(Json(ApiResponse::with_message("User created", created)))
}

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserSummary>>>, ApiError> {
    let users = state.admin_users.list_users().await?;
    Ok(Json(ApiResponse::ok(users)))
}

/// DELETE /api/admin/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    UserIdPath(user_id): UserIdPath,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let username = state.admin_users.delete_user(user_id).await?;
    Ok(Json(ApiResponse::with_message(
        format!("Deleted user {username}"),
        (),
    )))
}

/// POST /api/admin/users/{id}/password
pub async fn reset_password(
    State(state): State<AppState>,
    UserIdPath(user_id): UserIdPath,
    ApiJson(req): ApiJson<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let username = state
        .admin_users
        .reset_password(user_id, &req.new_password)
        .await?;
    Ok(Json(ApiResponse::with_message(
        format!("Password of {username} has been reset"),
        (),
    )))
}

/// POST /api/admin/users/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    UserIdPath(user_id): UserIdPath,
    ApiJson(req): ApiJson<SetStatusRequest>,
) -> Result<Json<ApiResponse<UserStatus>>, ApiError> {
    let status: UserStatus = req.status.parse()?;
    let user = state.admin_users.set_status(user_id, status).await?;
    Ok(Json(ApiResponse::ok(user.status)))
}

/// POST /api/admin/users/{id}/unbind
pub async fn unbind_device(
    State(state): State<AppState>,
    UserIdPath(user_id): UserIdPath,
) -> Result<Json<ApiResponse<UnbindResponse>>, ApiError> {
    let outcome = state.admin_users.unbind_device(user_id).await?;
    Ok(Json(ApiResponse::with_message(
        "Device unbound; the user must log in again",
        UnbindResponse {
            user_id,
            old_device_id: outcome.previous.as_ref().map(|d| d.redacted()),
            evicted_sessions: outcome.evicted,
        },
    )))
}
