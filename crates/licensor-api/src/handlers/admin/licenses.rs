//! Admin license handlers.

use axum::Json;
use axum::extract::State;

use licensor_service::UpdateLicenseRequest;

use crate::dto::request::{ExtendTimeRequest, UpdateQuotaRequest};
use crate::dto::response::{ApiResponse, ExtendResponse};
use crate::error::ApiError;
use crate::extractors::{ApiJson, UserIdPath};
use crate::state::AppState;

/// PUT /api/admin/users/{id}/license
pub async fn update_license(
    State(state): State<AppState>,
    UserIdPath(user_id): UserIdPath,
    ApiJson(req): ApiJson<UpdateLicenseRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let license = state.admin_licenses.update_license(user_id, req).await?;
    Ok(Json(ApiResponse::with_message(
        "License updated",
        serde_json::json!({
            "expire_date": license.expire_date,
            "max_simulators": license.max_devices,
            "max_daily_hours": license.max_daily_hours,
        }),
    )))
}

/// POST /api/admin/users/{id}/license/extend
pub async fn extend_time(
    State(state): State<AppState>,
    UserIdPath(user_id): UserIdPath,
    ApiJson(req): ApiJson<ExtendTimeRequest>,
) -> Result<Json<ApiResponse<ExtendResponse>>, ApiError> {
    let license = state
        .admin_licenses
        .extend_time(user_id, req.extend_days)
        .await?;
    Ok(Json(ApiResponse::with_message(
        format!("Extended by {} days", req.extend_days),
        ExtendResponse {
            new_expire_date: license.expire_date,
        },
    )))
}

/// PUT /api/admin/users/{id}/quota
pub async fn update_quota(
    State(state): State<AppState>,
    UserIdPath(user_id): UserIdPath,
    ApiJson(req): ApiJson<UpdateQuotaRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let license = state
        .admin_licenses
        .update_quota(user_id, req.max_windows, req.max_simulators)
        .await?;
    Ok(Json(ApiResponse::with_message(
        "Quota updated",
        serde_json::json!({
            "max_windows": license.max_windows,
            "max_simulators": license.max_devices,
        }),
    )))
}
