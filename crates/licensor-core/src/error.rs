//! Unified application error types for Licensor.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The [`ErrorKind`] display form is the
//! machine-readable `error_code` returned to clients.

use std::fmt;
use thiserror::Error;

/// Error categories used across the authority.
///
/// The first block is the user-facing login/session taxonomy; all of these
/// are recoverable. The second block covers the administrative surface and
/// infrastructure failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A required request field was missing or empty.
    InvalidInput,
    /// Unknown username or wrong password (never distinguished on the wire).
    InvalidCredentials,
    /// The account exists but is not active.
    AccountDisabled,
    /// The account is bound to a different device.
    DeviceBound,
    /// The user has no active license.
    NoLicense,
    /// The user's license is past its expiry date.
    LicenseExpired,
    /// The user already has the maximum number of live devices.
    DeviceLimit,
    /// The session token does not exist.
    InvalidToken,
    /// The session has not sent a heartbeat within the session timeout.
    SessionTimeout,

    /// The admin key did not match.
    Unauthorized,
    /// The requested resource was not found.
    NotFound,
    /// A conflict occurred (duplicate username, etc.).
    Conflict,
    /// Input failed a policy check (password length, quota ranges).
    Validation,
    /// The persistent store failed to read or write.
    Storage,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// A configuration error occurred.
    Configuration,
    /// An internal server error occurred.
    Internal,
}

impl ErrorKind {
    /// Return the wire error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountDisabled => "ACCOUNT_DISABLED",
            Self::DeviceBound => "DEVICE_BOUND",
            Self::NoLicense => "NO_LICENSE",
            Self::LicenseExpired => "LICENSE_EXPIRED",
            Self::DeviceLimit => "DEVICE_LIMIT",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::SessionTimeout => "SESSION_TIMEOUT",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::Validation => "VALIDATION",
            Self::Storage => "STORAGE",
            Self::Serialization => "SERIALIZATION",
            Self::Configuration => "CONFIGURATION",
            Self::Internal => "INTERNAL",
        }
    }

    /// Whether this kind represents a server-side failure rather than a
    /// rejected request.
    pub fn is_server_fault(&self) -> bool {
        matches!(
            self,
            Self::Storage | Self::Serialization | Self::Configuration | Self::Internal
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The unified application error used throughout Licensor.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional structured details returned to the caller.
    pub details: Option<serde_json::Value>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            source: Some(Box::new(source)),
        }
    }

    /// Attach structured details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Create an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    /// Create an invalid-credentials error with the fixed public message.
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials, "Invalid username or password")
    }

    /// Create an account-disabled error.
    pub fn account_disabled() -> Self {
        Self::new(ErrorKind::AccountDisabled, "Account is disabled")
    }

    /// Create a no-license error.
    pub fn no_license() -> Self {
        Self::new(ErrorKind::NoLicense, "No active license")
    }

    /// Create a license-expired error.
    pub fn license_expired() -> Self {
        Self::new(ErrorKind::LicenseExpired, "License has expired")
    }

    /// Create a device-limit error.
    pub fn device_limit(max_devices: u32) -> Self {
        Self::new(
            ErrorKind::DeviceLimit,
            format!("Device limit reached (max {max_devices})"),
        )
    }

    /// Create an invalid-token error.
    pub fn invalid_token() -> Self {
        Self::new(ErrorKind::InvalidToken, "Invalid token")
    }

    /// Create a session-timeout error.
    pub fn session_timeout() -> Self {
        Self::new(ErrorKind::SessionTimeout, "Session has timed out")
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            details: self.details.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
