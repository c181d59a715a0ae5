//! Read-only projection returned by `verify`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use licensor_core::types::UserId;

use crate::license::License;

use super::model::Session;

/// What a client learns about its own session and entitlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    /// Owning user.
    pub user_id: UserId,
    /// Owning user's login name.
    pub username: String,
    /// License expiry.
    pub expire_date: DateTime<Utc>,
    /// Window quota.
    pub max_windows: u32,
    /// Concurrent device cap.
    pub max_devices: u32,
    /// Usage accumulated by this session, in minutes.
    pub daily_usage: u32,
    /// Daily allowance in hours.
    pub max_daily_hours: u32,
}

impl SessionView {
    /// Project a session together with the license that currently backs it.
    pub fn project(session: &Session, license: &License) -> Self {
        Self {
            user_id: session.user_id,
            username: session.username.clone(),
            expire_date: license.expire_date,
            max_windows: license.max_windows,
            max_devices: license.max_devices,
            daily_usage: session.daily_usage,
            max_daily_hours: license.max_daily_hours,
        }
    }
}
