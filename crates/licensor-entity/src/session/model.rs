//! Session entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use licensor_core::types::{DeviceId, UserId};

use super::token::SessionToken;

/// Display name used until the client reports one on heartbeat.
pub const UNSET_REAL_NAME: &str = "unset";

/// A live (user, device) pairing kept alive by heartbeats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Bearer credential.
    pub token: SessionToken,
    /// Owning user.
    pub user_id: UserId,
    /// Owning user's login name, denormalised for list views.
    pub username: String,
    /// Display name last reported by the client.
    #[serde(default = "default_real_name")]
    pub real_name: String,
    /// Device the session was issued to.
    pub device_id: DeviceId,
    /// When the session was issued.
    pub login_time: DateTime<Utc>,
    /// Last heartbeat; only ever moves forward.
    pub last_heartbeat: DateTime<Utc>,
    /// Accumulated usage in minutes; never decreases while the session lives.
    #[serde(default)]
    pub daily_usage: u32,
}

impl Session {
    /// Issue a fresh session at `now`.
    pub fn issue(
        token: SessionToken,
        user_id: UserId,
        username: impl Into<String>,
        device_id: DeviceId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            token,
            user_id,
            username: username.into(),
            real_name: default_real_name(),
            device_id,
            login_time: now,
            last_heartbeat: now,
            daily_usage: 0,
        }
    }

    /// Time since the last heartbeat, clamped at zero.
    pub fn idle(&self, now: DateTime<Utc>) -> Duration {
        (now - self.last_heartbeat).max(Duration::zero())
    }

    /// Whether the session still holds its device slot.
    pub fn is_live(&self, now: DateTime<Utc>, heartbeat_timeout: Duration) -> bool {
        now - self.last_heartbeat < heartbeat_timeout
    }

    /// Whether the token has outlived the session timeout.
    pub fn is_timed_out(&self, now: DateTime<Utc>, session_timeout: Duration) -> bool {
        now - self.last_heartbeat > session_timeout
    }

    /// Record a heartbeat: advance liveness, credit usage, update the name.
    pub fn record_heartbeat(&mut self, now: DateTime<Utc>, usage_minutes: u32, real_name: &str) {
        if now > self.last_heartbeat {
            self.last_heartbeat = now;
        }
        self.daily_usage = self.daily_usage.saturating_add(usage_minutes);
        self.real_name = if real_name.trim().is_empty() {
            default_real_name()
        } else {
            real_name.to_string()
        };
    }
}

fn default_real_name() -> String {
    UNSET_REAL_NAME.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(now: DateTime<Utc>) -> Session {
        Session::issue(
            SessionToken::new("t"),
            UserId::new(),
            "alice",
            DeviceId::new("D1"),
            now,
        )
    }

    #[test]
    fn test_liveness_window_is_exclusive() {
        let now = Utc::now();
        let s = session(now);
        let timeout = Duration::minutes(5);
        assert!(s.is_live(now + Duration::seconds(299), timeout));
        assert!(!s.is_live(now + Duration::minutes(5), timeout));
    }

    #[test]
    fn test_session_timeout_is_strictly_greater() {
        let now = Utc::now();
        let s = session(now);
        let timeout = Duration::hours(1);
        assert!(!s.is_timed_out(now + Duration::hours(1), timeout));
        assert!(s.is_timed_out(now + Duration::hours(1) + Duration::seconds(1), timeout));
    }

    #[test]
    fn test_heartbeat_never_moves_backwards() {
        let now = Utc::now();
        let mut s = session(now);
        s.record_heartbeat(now - Duration::minutes(1), 5, "");
        assert_eq!(s.last_heartbeat, now);
        assert_eq!(s.daily_usage, 5);
        assert_eq!(s.real_name, UNSET_REAL_NAME);

        s.record_heartbeat(now + Duration::minutes(5), 5, "Alice");
        assert_eq!(s.last_heartbeat, now + Duration::minutes(5));
        assert_eq!(s.daily_usage, 10);
        assert_eq!(s.real_name, "Alice");
    }
}
