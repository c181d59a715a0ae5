//! Convenience result type alias for Licensor.

use crate::error::AppError;

/// A specialized `Result` type for Licensor operations.
pub type AppResult<T> = Result<T, AppError>;
