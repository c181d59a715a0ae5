//! Client session handlers: login, verify, heartbeat, logout and the
//! assigned-account fetch.

use axum::Json;
use axum::extract::State;

use licensor_entity::account::AccountEntry;

use crate::dto::request::{HeartbeatRequest, LoginRequest, TokenRequest};
use crate::dto::response::{ApiResponse, HeartbeatResponse, LoginResponse, VerifyResponse};
use crate::error::ApiError;
use crate::extractors::ApiJson;
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let outcome = state
        .session_manager
        .login(&req.username, &req.password, &req.device_id)
        .await?;

    let message = if outcome.device_bound_now {
        "Login successful (device bound)"
    } else {
        "Login successful"
    };
    Ok(Json(ApiResponse::with_message(
        message,
        LoginResponse::from(&outcome),
    )))
}

/// POST /api/auth/verify
pub async fn verify(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TokenRequest>,
) -> Result<Json<ApiResponse<VerifyResponse>>, ApiError> {
    let view = state.session_manager.verify(&req.token).await?;
    Ok(Json(ApiResponse::ok(VerifyResponse::from(view))))
}

/// POST /api/auth/heartbeat
pub async fn heartbeat(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<HeartbeatRequest>,
) -> Result<Json<ApiResponse<HeartbeatResponse>>, ApiError> {
    let session = state
        .session_manager
        .heartbeat(&req.token, &req.real_name)
        .await?;
    Ok(Json(ApiResponse::ok(HeartbeatResponse {
        daily_usage: session.daily_usage,
        last_heartbeat: session.last_heartbeat,
    })))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TokenRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.session_manager.logout(&req.token).await?;
    Ok(Json(ApiResponse::with_message("Logged out", ())))
}

/// POST /api/auth/accounts
pub async fn accounts(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TokenRequest>,
) -> Result<Json<ApiResponse<Vec<AccountEntry>>>, ApiError> {
    let view = state.session_manager.verify(&req.token).await?;
    let entries = state.admin_accounts.assigned_accounts(view.user_id).await?;
    Ok(Json(ApiResponse::ok(entries)))
}
