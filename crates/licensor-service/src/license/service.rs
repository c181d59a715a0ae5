//! License administration: term updates, extensions and quotas.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use licensor_auth::UserLocks;
use licensor_core::clock::Clock;
use licensor_core::error::AppError;
use licensor_core::result::AppResult;
use licensor_core::types::UserId;
use licensor_database::store::{LicenseStore, UserStore};
use licensor_entity::license::{License, LicenseStatus};

/// Allowed range for the window quota.
pub const MAX_WINDOWS_RANGE: (u32, u32) = (1, 20);

/// Allowed range for the device cap.
pub const MAX_DEVICES_RANGE: (u32, u32) = (1, 100);

/// `from` moved `days` into the future, or a validation error naming `field`
/// when the result leaves the representable date range.
pub(crate) fn add_days(from: DateTime<Utc>, days: u32, field: &str) -> AppResult<DateTime<Utc>> {
    Duration::try_days(i64::from(days))
        .and_then(|delta| from.checked_add_signed(delta))
        .ok_or_else(|| AppError::validation(format!("{field} is out of range")))
}

/// Partial update of license terms. Absent or zero fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLicenseRequest {
    /// Reset the expiry to this many days from now.
    #[serde(default)]
    pub expire_days: Option<u32>,
    /// New device cap.
    #[serde(default, alias = "max_simulators")]
    pub max_devices: Option<u32>,
    /// New daily allowance in hours.
    #[serde(default)]
    pub max_daily_hours: Option<u32>,
}

/// A license as shown in listings.
#[derive(Debug, Clone, Serialize)]
pub struct LicenseSummary {
    /// License key.
    pub license_key: String,
    /// Expiry.
    pub expire_date: DateTime<Utc>,
    /// Window quota.
    pub max_windows: u32,
    /// Device cap.
    #[serde(rename = "max_simulators")]
    pub max_devices: u32,
    /// Daily allowance in hours.
    pub max_daily_hours: u32,
    /// Lifecycle status.
    pub status: LicenseStatus,
    /// Whether the expiry has passed.
    pub expired: bool,
}

impl LicenseSummary {
    /// Summarize `license` as of `now`.
    pub fn from_license(license: &License, now: DateTime<Utc>) -> Self {
        Self {
            license_key: license.license_key.clone(),
            expire_date: license.expire_date,
            max_windows: license.max_windows,
            max_devices: license.max_devices,
            max_daily_hours: license.max_daily_hours,
            status: license.status,
            expired: license.is_expired(now),
        }
    }
}

/// Handles administrative license operations.
#[derive(Debug, Clone)]
pub struct LicenseAdminService {
    users: Arc<dyn UserStore>,
    licenses: Arc<dyn LicenseStore>,
    locks: Arc<UserLocks>,
    clock: Arc<dyn Clock>,
}

impl LicenseAdminService {
    /// Creates a new license admin service.
    pub fn new(
        users: Arc<dyn UserStore>,
        licenses: Arc<dyn LicenseStore>,
        locks: Arc<UserLocks>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            licenses,
            locks,
            clock,
        }
    }

    /// Applies every positive field of `req` to the user's active license.
    pub async fn update_license(
        &self,
        user_id: UserId,
        req: UpdateLicenseRequest,
    ) -> AppResult<License> {
        let _user_guard = self.locks.lock(user_id).await;
        let mut license = self.active_license(user_id).await?;
        let now = self.clock.now();

        if let Some(days) = req.expire_days.filter(|d| *d > 0) {
            license.expire_date = add_days(now, days, "expire_days")?;
        }
        if let Some(max_devices) = req.max_devices.filter(|m| *m > 0) {
            license.max_devices = max_devices;
        }
        if let Some(hours) = req.max_daily_hours.filter(|h| *h > 0) {
            license.max_daily_hours = hours;
        }
        license.updated_at = Some(now);
        self.licenses.update(license.clone()).await?;

        info!(
            target: "licensor::audit",
            action = "update_license",
            user_id = %user_id,
            expire_days = ?req.expire_days,
            max_devices = ?req.max_devices,
            max_daily_hours = ?req.max_daily_hours,
            "Updated license"
        );
        Ok(license)
    }

    /// Pushes the expiry of the active license `days` further out.
    pub async fn extend_time(&self, user_id: UserId, days: u32) -> AppResult<License> {
        if days == 0 {
            return Err(AppError::validation("extend_days must be positive"));
        }

        let _user_guard = self.locks.lock(user_id).await;
        let mut license = self.active_license(user_id).await?;
        license.expire_date = add_days(license.expire_date, days, "extend_days")?;
        license.updated_at = Some(self.clock.now());
        self.licenses.update(license.clone()).await?;

        info!(
            target: "licensor::audit",
            action = "extend_time",
            user_id = %user_id,
            extend_days = days,
            expire_date = %license.expire_date,
            "Extended license"
        );
        Ok(license)
    }

    /// Sets the window quota and device cap.
    pub async fn update_quota(
        &self,
        user_id: UserId,
        max_windows: u32,
        max_devices: u32,
    ) -> AppResult<License> {
        check_range("max_windows", max_windows, MAX_WINDOWS_RANGE)?;
        check_range("max_simulators", max_devices, MAX_DEVICES_RANGE)?;

        let _user_guard = self.locks.lock(user_id).await;
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }

        let mut license = self.active_license(user_id).await?;
        license.max_windows = max_windows;
        license.max_devices = max_devices;
        license.updated_at = Some(self.clock.now());
        self.licenses.update(license.clone()).await?;

        info!(
            target: "licensor::audit",
            action = "update_quota",
            user_id = %user_id,
            max_windows,
            max_devices,
            "Updated quota"
        );
        Ok(license)
    }

    async fn active_license(&self, user_id: UserId) -> AppResult<License> {
        self.licenses
            .find_active_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No active license for user {user_id}")))
    }
}

fn check_range(field: &str, value: u32, (min, max): (u32, u32)) -> AppResult<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "{field} must be between {min} and {max}"
        )))
    }
}
