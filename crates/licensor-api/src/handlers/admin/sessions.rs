//! Admin session handlers.

use axum::Json;
use axum::extract::State;

use licensor_auth::SweepReport;
use licensor_service::SessionSummary;

use crate::dto::response::{ApiResponse, KickResponse};
use crate::error::ApiError;
use crate::extractors::UserIdPath;
use crate::state::AppState;

/// GET /api/admin/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SessionSummary>>>, ApiError> {
    let sessions = state.admin_sessions.list_sessions().await?;
    Ok(Json(ApiResponse::ok(sessions)))
}

/// POST /api/admin/users/{id}/kick
pub async fn kick_user(
    State(state): State<AppState>,
    UserIdPath(user_id): UserIdPath,
) -> Result<Json<ApiResponse<KickResponse>>, ApiError> {
    let kicked = state.admin_sessions.kick_user(user_id).await?;
    Ok(Json(ApiResponse::with_message(
        format!("Kicked {kicked} sessions"),
        KickResponse { kicked },
    )))
}

/// POST /api/admin/sessions/clean
pub async fn clean_sessions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SweepReport>>, ApiError> {
    let report = state.admin_sessions.clean_sessions().await?;
    Ok(Json(ApiResponse::with_message(
        format!("Removed {} expired sessions", report.removed),
        report,
    )))
}
