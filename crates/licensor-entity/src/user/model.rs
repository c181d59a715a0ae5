//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use licensor_core::types::{DeviceId, UserId};

use super::status::UserStatus;

/// A registered account.
///
/// `bound_device_id` is written once by the first successful login and then
/// stays fixed until an administrator clears it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique, stable user identifier.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Email address (optional).
    #[serde(default)]
    pub email: Option<String>,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Account status.
    #[serde(default)]
    pub status: UserStatus,
    /// The single device this account may log in from.
    #[serde(default)]
    pub bound_device_id: Option<DeviceId>,
    /// When the current binding was made.
    #[serde(default)]
    pub device_bound_at: Option<DateTime<Utc>>,
    /// When the last binding was cleared.
    #[serde(default)]
    pub device_unbound_at: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a new, active, unbound account.
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        email: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            email,
            password_hash: password_hash.into(),
            status: UserStatus::Active,
            bound_device_id: None,
            device_bound_at: None,
            device_unbound_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the user can log in right now.
    pub fn can_login(&self) -> bool {
        self.status.can_login()
    }

    /// Whether the account currently has a device binding.
    pub fn is_device_bound(&self) -> bool {
        self.bound_device_id.is_some()
    }
}
