//! License entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use licensor_core::types::{LicenseId, UserId};

/// Lifecycle status of a license record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LicenseStatus {
    /// The license is in force (subject to its expiry date).
    #[default]
    Active,
    /// The license has been withdrawn and is ignored by lookups.
    Inactive,
}

/// An entitlement bounding one user's expiry, device concurrency and usage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    /// Unique license identifier.
    pub id: LicenseId,
    /// Owning user. One active license is expected per user.
    pub user_id: UserId,
    /// Opaque key shown to the administrator at issuance.
    pub license_key: String,
    /// Instant after which the license no longer admits logins or verifies.
    pub expire_date: DateTime<Utc>,
    /// Window quota reported to the client.
    #[serde(default = "default_max_windows")]
    pub max_windows: u32,
    /// Maximum number of distinct live devices.
    #[serde(alias = "max_simulators")]
    pub max_devices: u32,
    /// Daily usage allowance in hours. Tracked, not enforced.
    pub max_daily_hours: u32,
    /// Lifecycle status.
    #[serde(default)]
    pub status: LicenseStatus,
    /// When the license was issued.
    pub created_at: DateTime<Utc>,
    /// When the license was last changed.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl License {
    /// Whether the license has lapsed at `now`.
    ///
    /// A license expiring exactly at `now` is still valid.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expire_date < now
    }

    /// Whether lookups should consider this license.
    pub fn is_active(&self) -> bool {
        self.status == LicenseStatus::Active
    }
}

fn default_max_windows() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn license(expire_date: DateTime<Utc>) -> License {
        License {
            id: LicenseId::new(),
            user_id: UserId::new(),
            license_key: "k".to_string(),
            expire_date,
            max_windows: 1,
            max_devices: 1,
            max_daily_hours: 24,
            status: LicenseStatus::Active,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        assert!(!license(now).is_expired(now));
        assert!(license(now - Duration::seconds(1)).is_expired(now));
        assert!(!license(now + Duration::days(30)).is_expired(now));
    }

    #[test]
    fn test_legacy_field_names_deserialize() {
        let json = serde_json::json!({
            "id": LicenseId::new(),
            "user_id": UserId::new(),
            "license_key": "abc",
            "expire_date": "2030-01-01T00:00:00Z",
            "max_simulators": 3,
            "max_daily_hours": 12,
            "created_at": "2025-01-01T00:00:00Z"
        });
        let parsed: License = serde_json::from_value(json).expect("deserialize");
        assert_eq!(parsed.max_devices, 3);
        assert_eq!(parsed.max_windows, 1);
        assert!(parsed.is_active());
    }
}
