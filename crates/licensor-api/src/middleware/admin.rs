//! Admin-key gate for the administrative routes.
//!
//! Requests must carry the shared key in the `x-admin-key` header. The key is
//! compared in constant time. Accepted requests run the opportunistic
//! liveness sweep before reaching their handler.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use subtle::ConstantTimeEq;
use tracing::warn;

use licensor_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the admin key.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Rejects requests without the configured admin key.
pub async fn require_admin_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = request
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !keys_match(provided, &state.config.auth.admin_key) {
        warn!(path = %request.uri().path(), "Rejected admin request with invalid key");
        return Err(AppError::unauthorized("Invalid admin key").into());
    }

    state.admin_sessions.sweep_before_request().await?;
    Ok(next.run(request).await)
}

fn keys_match(provided: &str, expected: &str) -> bool {
    !expected.is_empty() && bool::from(provided.as_bytes().ct_eq(expected.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_match() {
        assert!(keys_match("secret", "secret"));
        assert!(!keys_match("secreT", "secret"));
        assert!(!keys_match("", "secret"));
        assert!(!keys_match("", ""));
    }
}
