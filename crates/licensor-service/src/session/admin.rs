//! Session administration: listing, kicking and sweeping.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use licensor_auth::{SessionRegistry, SweepReport, UserLocks};
use licensor_core::clock::Clock;
use licensor_core::result::AppResult;
use licensor_core::types::UserId;
use licensor_entity::session::Session;

/// One live session as shown to administrators.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    /// Token prefix.
    pub token: String,
    /// Owning user.
    pub user_id: UserId,
    /// Owning user's login name.
    pub username: String,
    /// Display name reported by the client.
    pub real_name: String,
    /// Truncated device id.
    pub device_id: String,
    /// Issue time.
    pub login_time: DateTime<Utc>,
    /// Last heartbeat.
    pub last_heartbeat: DateTime<Utc>,
    /// Accumulated usage in minutes.
    pub daily_usage: u32,
    /// Seconds since the last heartbeat.
    pub idle_seconds: i64,
}

impl SessionSummary {
    fn from_session(session: Session, now: DateTime<Utc>) -> Self {
        let token: String = session.token.as_str().chars().take(8).collect();
        Self {
            token: format!("{token}..."),
            user_id: session.user_id,
            device_id: session.device_id.redacted(),
            idle_seconds: session.idle(now).num_seconds(),
            username: session.username,
            real_name: session.real_name,
            login_time: session.login_time,
            last_heartbeat: session.last_heartbeat,
            daily_usage: session.daily_usage,
        }
    }
}

/// Handles administrative session operations.
#[derive(Debug, Clone)]
pub struct SessionAdminService {
    registry: Arc<SessionRegistry>,
    locks: Arc<UserLocks>,
    clock: Arc<dyn Clock>,
    sweep_on_request: bool,
}

impl SessionAdminService {
    /// Creates a new session admin service.
    pub fn new(
        registry: Arc<SessionRegistry>,
        locks: Arc<UserLocks>,
        clock: Arc<dyn Clock>,
        sweep_on_request: bool,
    ) -> Self {
        Self {
            registry,
            locks,
            clock,
            sweep_on_request,
        }
    }

    /// Live sessions across all users.
    pub async fn list_sessions(&self) -> AppResult<Vec<SessionSummary>> {
        let now = self.clock.now();
        Ok(self
            .registry
            .list_live()
            .await?
            .into_iter()
            .map(|s| SessionSummary::from_session(s, now))
            .collect())
    }

    /// Removes every session of a user. Returns how many were removed.
    pub async fn kick_user(&self, user_id: UserId) -> AppResult<usize> {
        let _user_guard = self.locks.lock(user_id).await;
        self.registry.kick(user_id).await
    }

    /// Removes every dead session.
    pub async fn clean_sessions(&self) -> AppResult<SweepReport> {
        let report = self.registry.sweep().await?;
        info!(
            target: "licensor::audit",
            action = "clean_sessions",
            removed = report.removed,
            remaining = report.remaining,
            "Cleaned sessions"
        );
        Ok(report)
    }

    /// The opportunistic sweep run ahead of each administrative request.
    pub async fn sweep_before_request(&self) -> AppResult<()> {
        if self.sweep_on_request {
            self.registry.sweep().await?;
        }
        Ok(())
    }
}
