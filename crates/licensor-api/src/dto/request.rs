//! Request DTOs.
//!
//! Missing string fields default to empty so they surface as
//! `INVALID_INPUT` from the authority instead of a body rejection.

use serde::Deserialize;

/// `POST /api/auth/login`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    /// Login name.
    #[serde(default)]
    pub username: String,
    /// Password.
    #[serde(default)]
    pub password: String,
    /// Hardware identifier of the client device.
    #[serde(default)]
    pub device_id: String,
}

/// `POST /api/auth/verify` and `POST /api/auth/logout`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenRequest {
    /// Session token.
    #[serde(default)]
    pub token: String,
}

/// `POST /api/auth/heartbeat`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeartbeatRequest {
    /// Session token.
    #[serde(default)]
    pub token: String,
    /// Display name of the operator.
    #[serde(default)]
    pub real_name: String,
}

/// `POST /api/admin/users/{id}/license/extend`
#[derive(Debug, Clone, Deserialize)]
pub struct ExtendTimeRequest {
    /// Days to add to the current expiry.
    pub extend_days: u32,
}

/// `PUT /api/admin/users/{id}/quota`
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateQuotaRequest {
    /// Window quota.
    pub max_windows: u32,
    /// Device cap.
    #[serde(alias = "max_devices")]
    pub max_simulators: u32,
}

/// `POST /api/admin/users/{id}/password`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetPasswordRequest {
    /// Replacement password.
    #[serde(default)]
    pub new_password: String,
}

/// `POST /api/admin/users/{id}/status`
#[derive(Debug, Clone, Deserialize)]
pub struct SetStatusRequest {
    /// `active` or `disabled`.
    pub status: String,
}

/// `PUT /api/admin/users/{id}/accounts`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetAccountsRequest {
    /// One account per line; blank lines and `#` comments are dropped.
    #[serde(default)]
    pub accounts: String,
}
