//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use licensor_auth::LoginOutcome;
use licensor_core::types::UserId;
use licensor_entity::session::SessionView;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Optional human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    /// Creates a successful response with a message.
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Session token.
    pub token: String,
    /// User id.
    pub user_id: UserId,
    /// Login name.
    pub username: String,
    /// License expiry.
    pub expire_date: DateTime<Utc>,
    /// Window quota.
    pub max_windows: u32,
    /// Device cap.
    pub max_simulators: u32,
    /// Daily allowance in hours.
    pub max_daily_hours: u32,
    /// Whether the account is bound to a device.
    pub device_bound: bool,
    /// Truncated device id.
    pub device_id: String,
}

impl From<&LoginOutcome> for LoginResponse {
    fn from(outcome: &LoginOutcome) -> Self {
        Self {
            token: outcome.session.token.as_str().to_string(),
            user_id: outcome.user.id,
            username: outcome.user.username.clone(),
            expire_date: outcome.license.expire_date,
            max_windows: outcome.license.max_windows,
            max_simulators: outcome.license.max_devices,
            max_daily_hours: outcome.license.max_daily_hours,
            device_bound: outcome.user.is_device_bound(),
            device_id: outcome.session.device_id.redacted(),
        }
    }
}

/// Verify response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// User id.
    pub user_id: UserId,
    /// Login name.
    pub username: String,
    /// License expiry.
    pub expire_date: DateTime<Utc>,
    /// Window quota.
    pub max_windows: u32,
    /// Device cap.
    pub max_simulators: u32,
    /// Usage accumulated by this session, in minutes.
    pub daily_usage: u32,
    /// Daily allowance in hours.
    pub max_daily_hours: u32,
}

impl From<SessionView> for VerifyResponse {
    fn from(view: SessionView) -> Self {
        Self {
            user_id: view.user_id,
            username: view.username,
            expire_date: view.expire_date,
            max_windows: view.max_windows,
            max_simulators: view.max_devices,
            daily_usage: view.daily_usage,
            max_daily_hours: view.max_daily_hours,
        }
    }
}

/// Heartbeat response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatResponse {
    /// Accumulated usage in minutes.
    pub daily_usage: u32,
    /// Recorded heartbeat time.
    pub last_heartbeat: DateTime<Utc>,
}

/// Health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since startup.
    pub uptime_seconds: u64,
}

/// Unbind response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnbindResponse {
    /// User id.
    pub user_id: UserId,
    /// Truncated previous binding.
    pub old_device_id: Option<String>,
    /// Sessions evicted.
    pub evicted_sessions: usize,
}

/// Kick response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KickResponse {
    /// Sessions removed.
    pub kicked: usize,
}

/// Extend response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendResponse {
    /// New expiry.
    pub new_expire_date: DateTime<Utc>,
}

/// Stored account lines as editable text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountsTextResponse {
    /// Lines joined with `\n`.
    pub accounts: String,
}
