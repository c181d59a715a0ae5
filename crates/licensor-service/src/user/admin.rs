//! Admin user management: creation, deletion, listing, status, passwords and
//! device bindings.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use licensor_auth::{
    DeviceBindingGuard, PasswordHasher, PasswordValidator, SessionRegistry, TokenGenerator,
    UnbindOutcome, UserLocks,
};
use licensor_core::clock::Clock;
use licensor_core::config::LicenseConfig;
use licensor_core::error::AppError;
use licensor_core::result::AppResult;
use licensor_core::types::{LicenseId, UserId, truncate_identifier};
use licensor_database::store::{AccountStore, LicenseStore, UserStore};
use licensor_entity::license::{License, LicenseStatus};
use licensor_entity::user::{User, UserStatus};

use crate::license::LicenseSummary;
use crate::license::service::add_days;

/// Request to create a user together with its license.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Unique login name.
    pub username: String,
    /// Initial password.
    pub password: String,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Days until the license expires.
    #[serde(default)]
    pub expire_days: Option<u32>,
    /// Window quota.
    #[serde(default)]
    pub max_windows: Option<u32>,
    /// Concurrent device cap.
    #[serde(default, alias = "max_simulators")]
    pub max_devices: Option<u32>,
    /// Daily usage allowance in hours.
    #[serde(default)]
    pub max_daily_hours: Option<u32>,
}

/// A newly created user and its license terms.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedUser {
    /// New user id.
    pub user_id: UserId,
    /// Login name.
    pub username: String,
    /// Issued license key.
    pub license_key: String,
    /// License expiry.
    pub expire_date: DateTime<Utc>,
    /// Window quota.
    pub max_windows: u32,
    /// Concurrent device cap.
    #[serde(rename = "max_simulators")]
    pub max_devices: u32,
    /// Daily usage allowance in hours.
    pub max_daily_hours: u32,
}

/// One row of the user listing.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    /// User id.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: Option<String>,
    /// Account status.
    pub status: UserStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Active license, if any.
    pub license: Option<LicenseSummary>,
    /// Live sessions of this user.
    pub online_devices: usize,
    /// Truncated bound device.
    pub bound_device_id: Option<String>,
    /// When the binding was made.
    pub device_bound_at: Option<DateTime<Utc>>,
    /// Whether the account is bound.
    pub device_bound: bool,
}

/// Handles administrative user management operations.
#[derive(Debug, Clone)]
pub struct AdminUserService {
    users: Arc<dyn UserStore>,
    licenses: Arc<dyn LicenseStore>,
    accounts: Arc<dyn AccountStore>,
    registry: Arc<SessionRegistry>,
    guard: Arc<DeviceBindingGuard>,
    locks: Arc<UserLocks>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    tokens: TokenGenerator,
    defaults: LicenseConfig,
    clock: Arc<dyn Clock>,
}

impl AdminUserService {
    /// Creates a new admin user service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserStore>,
        licenses: Arc<dyn LicenseStore>,
        accounts: Arc<dyn AccountStore>,
        registry: Arc<SessionRegistry>,
        guard: Arc<DeviceBindingGuard>,
        locks: Arc<UserLocks>,
        hasher: PasswordHasher,
        validator: PasswordValidator,
        defaults: LicenseConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            licenses,
            accounts,
            registry,
            guard,
            locks,
            hasher,
            validator,
            tokens: TokenGenerator::default(),
            defaults,
            clock,
        }
    }

    /// Creates a user and an active license for it.
    pub async fn create_user(&self, req: CreateUserRequest) -> AppResult<CreatedUser> {
        let username = req.username.trim();
        if username.is_empty() || req.password.is_empty() {
            return Err(AppError::invalid_input("username and password are required"));
        }
        self.validator.validate(&req.password)?;

        let expire_days = req.expire_days.unwrap_or(self.defaults.default_expire_days);
        let max_windows = req.max_windows.unwrap_or(self.defaults.default_max_windows);
        let max_devices = req.max_devices.unwrap_or(self.defaults.default_max_devices);
        let max_daily_hours = req
            .max_daily_hours
            .unwrap_or(self.defaults.default_max_daily_hours);

        if expire_days == 0 {
            return Err(AppError::validation("expire_days must be positive"));
        }
        if max_windows == 0 || max_devices == 0 {
            return Err(AppError::validation(
                "max_windows and max_simulators must be at least 1",
            ));
        }

        if self.users.find_by_username(username).await?.is_some() {
            return Err(AppError::conflict(format!("Username '{username}' already exists")));
        }

        let now = self.clock.now();
        let expire_date = add_days(now, expire_days, "expire_days")?;
        let password_hash = self.hasher.hash_password(&req.password)?;
        let email = req.email.filter(|e| !e.trim().is_empty());
        let user = User::new(username, password_hash, email, now);
        let user_id = user.id;

        let license = License {
            id: LicenseId::new(),
            user_id,
            license_key: self.tokens.license_key(),
            expire_date,
            max_windows,
            max_devices,
            max_daily_hours,
            status: LicenseStatus::Active,
            created_at: now,
            updated_at: None,
        };

        self.users.insert(user).await?;
        if let Err(e) = self.licenses.insert(license.clone()).await {
            // Do not leave a user behind without the license it was created with.
            if let Err(rollback) = self.users.delete(user_id).await {
                warn!(user_id = %user_id, error = %rollback, "Failed to roll back user creation");
            }
            return Err(e);
        }

        info!(
            target: "licensor::audit",
            action = "create_user",
            user_id = %user_id,
            username = %truncate_identifier(username),
            expire_days,
            max_devices,
            "Created user"
        );

        Ok(CreatedUser {
            user_id,
            username: username.to_string(),
            license_key: license.license_key,
            expire_date: license.expire_date,
            max_windows,
            max_devices,
            max_daily_hours,
        })
    }

    /// Deletes a user with all of its licenses, sessions and assigned accounts.
    ///
    /// Returns the deleted username.
    pub async fn delete_user(&self, user_id: UserId) -> AppResult<String> {
        let _user_guard = self.locks.lock(user_id).await;
        let user = self.find(user_id).await?;

        let sessions = self.registry.evict_all(user_id).await?;
        let licenses = self.licenses.delete_by_user(user_id).await?;
        self.accounts.delete_by_user(user_id).await?;
        self.users.delete(user_id).await?;
        self.locks.forget(user_id);

        info!(
            target: "licensor::audit",
            action = "delete_user",
            user_id = %user_id,
            username = %truncate_identifier(&user.username),
            sessions,
            licenses,
            "Deleted user"
        );
        Ok(user.username)
    }

    /// Lists every user with its license and live-device count.
    pub async fn list_users(&self) -> AppResult<Vec<UserSummary>> {
        let now = self.clock.now();
        let users = self.users.list().await?;
        let licenses = self.licenses.list().await?;
        let live = self.registry.list_live().await?;

        Ok(users
            .into_iter()
            .map(|user| {
                let license = licenses
                    .iter()
                    .find(|l| l.user_id == user.id && l.is_active())
                    .map(|l| LicenseSummary::from_license(l, now));
                let online_devices = live.iter().filter(|s| s.user_id == user.id).count();
                UserSummary {
                    id: user.id,
                    device_bound: user.is_device_bound(),
                    bound_device_id: user.bound_device_id.as_ref().map(|d| d.redacted()),
                    device_bound_at: user.device_bound_at,
                    username: user.username,
                    email: user.email,
                    status: user.status,
                    created_at: user.created_at,
                    license,
                    online_devices,
                }
            })
            .collect())
    }

    /// Replaces a user's password. Returns the username.
    pub async fn reset_password(&self, user_id: UserId, new_password: &str) -> AppResult<String> {
        self.validator.validate(new_password)?;

        let _user_guard = self.locks.lock(user_id).await;
        let mut user = self.find(user_id).await?;
        user.password_hash = self.hasher.hash_password(new_password)?;
        user.updated_at = self.clock.now();
        let username = user.username.clone();
        self.users.update(user).await?;

        info!(
            target: "licensor::audit",
            action = "reset_password",
            user_id = %user_id,
            username = %truncate_identifier(&username),
            "Reset password"
        );
        Ok(username)
    }

    /// Enables or disables an account.
    ///
    /// Disabling also evicts every session of the account.
    pub async fn set_status(&self, user_id: UserId, status: UserStatus) -> AppResult<User> {
        let _user_guard = self.locks.lock(user_id).await;
        let mut user = self.find(user_id).await?;
        user.status = status;
        user.updated_at = self.clock.now();
        self.users.update(user.clone()).await?;

        let evicted = if status.can_login() {
            0
        } else {
            self.registry.evict_all(user_id).await?
        };

        info!(
            target: "licensor::audit",
            action = "set_status",
            user_id = %user_id,
            username = %truncate_identifier(&user.username),
            status = %status,
            evicted,
            "Changed account status"
        );
        Ok(user)
    }

    /// Clears the device binding of a user and evicts its sessions.
    pub async fn unbind_device(&self, user_id: UserId) -> AppResult<UnbindOutcome> {
        self.guard.unbind(user_id).await
    }

    async fn find(&self, user_id: UserId) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
    }
}
