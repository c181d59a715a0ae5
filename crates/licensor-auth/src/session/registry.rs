//! The session registry.
//!
//! Holds no state of its own beyond a write lock: every operation reads the
//! full session set from the [`SessionStore`], computes the next set, and
//! writes it back in one `replace_all`. The registry lock makes each of these
//! read-modify-write sequences exclusive. When the write fails the operation
//! fails and nothing is reported as done.

use std::sync::Arc;

use chrono::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

use licensor_core::clock::Clock;
use licensor_core::config::SessionConfig;
use licensor_core::error::AppError;
use licensor_core::result::AppResult;
use licensor_core::types::{DeviceId, UserId};
use licensor_database::store::SessionStore;
use licensor_entity::session::{Session, SessionToken};
use licensor_entity::user::User;

use crate::token::TokenGenerator;

use super::admission::{Decision, classify, decide};
use super::sweeper::{SweepReport, sweep_dead};

/// Result of a successful admission.
#[derive(Debug, Clone)]
pub struct Admission {
    /// The newly issued session.
    pub session: Session,
    /// Whether the session replaced a live slot for the same device.
    pub reused_slot: bool,
    /// Stale sessions pruned by this write.
    pub pruned: usize,
}

/// Persisted table of sessions with admission, renewal and eviction.
pub struct SessionRegistry {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    tokens: TokenGenerator,
    heartbeat_timeout: Duration,
    heartbeat_usage_minutes: u32,
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("heartbeat_timeout", &self.heartbeat_timeout)
            .field("heartbeat_usage_minutes", &self.heartbeat_usage_minutes)
            .finish()
    }
}

impl SessionRegistry {
    /// Creates a registry over `store`.
    pub fn new(store: Arc<dyn SessionStore>, clock: Arc<dyn Clock>, config: &SessionConfig) -> Self {
        Self {
            store,
            clock,
            tokens: TokenGenerator::new(config.token_bytes),
            heartbeat_timeout: config.heartbeat_timeout(),
            heartbeat_usage_minutes: config.heartbeat_usage_minutes,
            write_lock: Mutex::new(()),
        }
    }

    /// Admit `user` on `device` under a cap of `max_devices` live devices.
    ///
    /// Stale sessions of every user are pruned by the same write. A live
    /// session for the same device is replaced in place; otherwise the new
    /// session is appended. Fails with `DEVICE_LIMIT` without writing when
    /// the device is new and the user is at the cap.
    pub async fn admit(
        &self,
        user: &User,
        device: &DeviceId,
        max_devices: u32,
    ) -> AppResult<Admission> {
        let _guard = self.write_lock.lock().await;
        let now = self.clock.now();
        let sessions = self.store.load_all().await?;

        let mut classification = classify(sessions, user.id, device, now, self.heartbeat_timeout);

        if decide(
            classification.active_devices,
            classification.device_exists(),
            max_devices,
        ) == Decision::Reject
        {
            return Err(AppError::device_limit(max_devices).with_details(serde_json::json!({
                "active_devices": classification.active_devices,
                "max_devices": max_devices,
            })));
        }

        let token = self.unique_token(&classification.kept);
        let session = Session::issue(token, user.id, &user.username, device.clone(), now);

        let reused_slot = match classification.same_device_slot {
            Some(idx) => {
                classification.kept[idx] = session.clone();
                true
            }
            None => {
                classification.kept.push(session.clone());
                false
            }
        };

        self.store.replace_all(classification.kept).await?;

        if classification.dropped > 0 {
            debug!(pruned = classification.dropped, "Pruned stale sessions during admission");
        }

        Ok(Admission {
            session,
            reused_slot,
            pruned: classification.dropped,
        })
    }

    /// Look up a session by exact token.
    pub async fn find(&self, token: &str) -> AppResult<Option<Session>> {
        let sessions = self.store.load_all().await?;
        Ok(sessions.into_iter().find(|s| s.token.as_str() == token))
    }

    /// Record a heartbeat. Returns the updated session, or `None` when the
    /// token is unknown.
    pub async fn heartbeat(&self, token: &str, real_name: &str) -> AppResult<Option<Session>> {
        let _guard = self.write_lock.lock().await;
        let now = self.clock.now();
        let mut sessions = self.store.load_all().await?;

        let Some(session) = sessions.iter_mut().find(|s| s.token.as_str() == token) else {
            return Ok(None);
        };
        session.record_heartbeat(now, self.heartbeat_usage_minutes, real_name);
        let updated = session.clone();

        self.store.replace_all(sessions).await?;
        Ok(Some(updated))
    }

    /// Remove the session with `token`. Returns the removed session.
    pub async fn remove(&self, token: &str) -> AppResult<Option<Session>> {
        let _guard = self.write_lock.lock().await;
        let mut sessions = self.store.load_all().await?;

        let Some(idx) = sessions.iter().position(|s| s.token.as_str() == token) else {
            return Ok(None);
        };
        let removed = sessions.remove(idx);

        self.store.replace_all(sessions).await?;
        Ok(Some(removed))
    }

    /// Remove every session of `user_id` regardless of liveness.
    ///
    /// Returns how many were removed. Skips the write when there were none.
    pub async fn evict_all(&self, user_id: UserId) -> AppResult<usize> {
        let _guard = self.write_lock.lock().await;
        let sessions = self.store.load_all().await?;

        let before = sessions.len();
        let remaining: Vec<Session> = sessions.into_iter().filter(|s| s.user_id != user_id).collect();
        let removed = before - remaining.len();

        if removed > 0 {
            self.store.replace_all(remaining).await?;
        }
        Ok(removed)
    }

    /// Administrative kick: remove every session of `user_id`.
    pub async fn kick(&self, user_id: UserId) -> AppResult<usize> {
        let removed = self.evict_all(user_id).await?;
        info!(
            target: "licensor::audit",
            action = "kick_user",
            user_id = %user_id,
            removed,
            "Kicked user sessions"
        );
        Ok(removed)
    }

    /// Sessions whose heartbeat is within the heartbeat timeout.
    pub async fn list_live(&self) -> AppResult<Vec<Session>> {
        let now = self.clock.now();
        let sessions = self.store.load_all().await?;
        Ok(sessions
            .into_iter()
            .filter(|s| s.is_live(now, self.heartbeat_timeout))
            .collect())
    }

    /// Every stored session, live or not.
    pub async fn list_all(&self) -> AppResult<Vec<Session>> {
        self.store.load_all().await
    }

    /// Remove every dead session across all users.
    ///
    /// Nothing is written when nothing was removed.
    pub async fn sweep(&self) -> AppResult<SweepReport> {
        let _guard = self.write_lock.lock().await;
        let now = self.clock.now();
        let sessions = self.store.load_all().await?;

        let (live, report) = sweep_dead(sessions, now, self.heartbeat_timeout);
        if report.removed > 0 {
            self.store.replace_all(live).await?;
            debug!(removed = report.removed, remaining = report.remaining, "Swept dead sessions");
        }
        Ok(report)
    }

    fn unique_token(&self, existing: &[Session]) -> SessionToken {
        loop {
            let token = self.tokens.session_token();
            if !existing.iter().any(|s| s.token == token) {
                return token;
            }
        }
    }
}
