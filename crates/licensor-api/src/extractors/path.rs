//! `UserIdPath` extractor: the `{id}` path segment parsed as a [`UserId`].

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use licensor_core::error::AppError;
use licensor_core::types::UserId;

use crate::error::ApiError;

/// The user addressed by the request path.
#[derive(Debug, Clone, Copy)]
pub struct UserIdPath(pub UserId);

impl<S> FromRequestParts<S> for UserIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::invalid_input(e.body_text()))?;

        raw.parse::<UserId>()
            .map(Self)
            .map_err(|_| AppError::invalid_input(format!("Invalid user id: {raw}")).into())
    }
}
