//! Admin account assignment handlers.

use axum::Json;
use axum::extract::State;

use licensor_service::AccountsUpdated;

use crate::dto::request::SetAccountsRequest;
use crate::dto::response::{AccountsTextResponse, ApiResponse};
use crate::error::ApiError;
use crate::extractors::{ApiJson, UserIdPath};
use crate::state::AppState;

/// PUT /api/admin/users/{id}/accounts
pub async fn set_accounts(
    State(state): State<AppState>,
    UserIdPath(user_id): UserIdPath,
    ApiJson(req): ApiJson<SetAccountsRequest>,
) -> Result<Json<ApiResponse<AccountsUpdated>>, ApiError> {
    let updated = state
        .admin_accounts
        .set_accounts(user_id, &req.accounts)
        .await?;
    Ok(Json(ApiResponse::with_message(
        format!(
            "Assigned {} accounts to {}",
            updated.account_count, updated.username
        ),
        updated,
    )))
}

/// GET /api/admin/users/{id}/accounts
pub async fn get_accounts(
    State(state): State<AppState>,
    UserIdPath(user_id): UserIdPath,
) -> Result<Json<ApiResponse<AccountsTextResponse>>, ApiError> {
    let accounts = state.admin_accounts.accounts_text(user_id).await?;
    Ok(Json(ApiResponse::ok(AccountsTextResponse { accounts })))
}
