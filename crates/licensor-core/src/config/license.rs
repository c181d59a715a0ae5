//! Defaults applied to newly issued licenses.

use serde::{Deserialize, Serialize};

/// License issuance defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseConfig {
    /// Days until a new license expires.
    #[serde(default = "default_expire_days")]
    pub default_expire_days: u32,
    /// Concurrent device cap of a new license.
    #[serde(default = "default_max_devices")]
    pub default_max_devices: u32,
    /// Window quota of a new license.
    #[serde(default = "default_max_windows")]
    pub default_max_windows: u32,
    /// Daily usage hours of a new license.
    #[serde(default = "default_max_daily_hours")]
    pub default_max_daily_hours: u32,
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            default_expire_days: default_expire_days(),
            default_max_devices: default_max_devices(),
            default_max_windows: default_max_windows(),
            default_max_daily_hours: default_max_daily_hours(),
        }
    }
}

fn default_expire_days() -> u32 {
    30
}

fn default_max_devices() -> u32 {
    5
}

fn default_max_windows() -> u32 {
    4
}

fn default_max_daily_hours() -> u32 {
    24
}
