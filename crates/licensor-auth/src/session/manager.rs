//! Session lifecycle manager: login, verify, heartbeat and logout flows.

use std::sync::Arc;

use tracing::{info, warn};

use licensor_core::clock::Clock;
use licensor_core::config::SessionConfig;
use licensor_core::error::{AppError, ErrorKind};
use licensor_core::result::AppResult;
use licensor_core::types::{DeviceId, truncate_identifier};
use licensor_database::store::{LicenseStore, UserStore};
use licensor_entity::license::License;
use licensor_entity::session::{Session, SessionView};
use licensor_entity::user::User;

use crate::device::{BindingResult, DeviceBindingGuard};
use crate::lock::UserLocks;
use crate::password::PasswordHasher;

use super::registry::SessionRegistry;

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// The issued session.
    pub session: Session,
    /// The authenticated user, including any binding made by this login.
    pub user: User,
    /// The license the session was admitted under.
    pub license: License,
    /// Whether this login bound the account to its device.
    pub device_bound_now: bool,
    /// Whether the session replaced a live one on the same device.
    pub reused_slot: bool,
}

/// Manages the client-facing session lifecycle.
#[derive(Clone)]
pub struct SessionManager {
    /// Credential store.
    users: Arc<dyn UserStore>,
    /// License store.
    licenses: Arc<dyn LicenseStore>,
    /// Session registry.
    registry: Arc<SessionRegistry>,
    /// Device binding guard.
    guard: Arc<DeviceBindingGuard>,
    /// Per-user locks shared with the admin layer.
    locks: Arc<UserLocks>,
    /// Password hasher.
    hasher: PasswordHasher,
    /// Time source.
    clock: Arc<dyn Clock>,
    /// Session configuration.
    config: SessionConfig,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("config", &self.config)
            .finish()
    }
}

impl SessionManager {
    /// Creates a new session manager with all required dependencies.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserStore>,
        licenses: Arc<dyn LicenseStore>,
        registry: Arc<SessionRegistry>,
        guard: Arc<DeviceBindingGuard>,
        locks: Arc<UserLocks>,
        hasher: PasswordHasher,
        clock: Arc<dyn Clock>,
        config: SessionConfig,
    ) -> Self {
        Self {
            users,
            licenses,
            registry,
            guard,
            locks,
            hasher,
            clock,
            config,
        }
    }

    /// Performs the complete login flow:
    ///
    /// 1. Require username, password and device id
    /// 2. Verify credentials
    /// 3. Check account status
    /// 4. Bind or check the device
    /// 5. Resolve the active license and check expiry
    /// 6. Admit into the session registry under the device cap
    ///
    /// Steps 3 to 6 run under the user lock.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        device_id: &str,
    ) -> AppResult<LoginOutcome> {
        let username = username.trim();
        let device = DeviceId::new(device_id.trim());
        if username.is_empty() || password.is_empty() || device.is_blank() {
            return Err(AppError::invalid_input(
                "username, password and device_id are required",
            ));
        }

        let Some(user) = self.users.find_by_username(username).await? else {
            warn!(
                target: "licensor::audit",
                action = "login_failed",
                username = %truncate_identifier(username),
                reason = "unknown_user",
                "Login failed"
            );
            return Err(AppError::invalid_credentials());
        };

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(
                target: "licensor::audit",
                action = "login_failed",
                user_id = %user.id,
                username = %truncate_identifier(&user.username),
                reason = "bad_password",
                "Login failed"
            );
            return Err(AppError::invalid_credentials());
        }

        let _user_guard = self.locks.lock(user.id).await;

        // Re-read under the lock so a concurrent unbind or disable is seen.
        let mut user = self
            .users
            .find_by_id(user.id)
            .await?
            .ok_or_else(AppError::invalid_credentials)?;

        if !user.can_login() {
            warn!(
                target: "licensor::audit",
                action = "login_blocked",
                user_id = %user.id,
                username = %truncate_identifier(&user.username),
                status = %user.status,
                "Login blocked for inactive account"
            );
            return Err(AppError::account_disabled());
        }

        let device_bound_now = match self.guard.bind_or_check(&mut user, &device).await? {
            BindingResult::Allowed => false,
            BindingResult::BoundNow => true,
            BindingResult::BoundToOther { bound } => {
                return Err(AppError::new(
                    ErrorKind::DeviceBound,
                    "Account is bound to another device",
                )
                .with_details(serde_json::json!({
                    "bound_device_id": bound.redacted(),
                    "current_device_id": device.redacted(),
                })));
            }
        };

        let now = self.clock.now();
        let Some(license) = self.licenses.find_active_by_user(user.id).await? else {
            warn!(
                target: "licensor::audit",
                action = "login_no_license",
                user_id = %user.id,
                username = %truncate_identifier(&user.username),
                "Login without an active license"
            );
            return Err(AppError::no_license());
        };

        if license.is_expired(now) {
            warn!(
                target: "licensor::audit",
                action = "login_expired",
                user_id = %user.id,
                username = %truncate_identifier(&user.username),
                expire_date = %license.expire_date,
                "Login with an expired license"
            );
            return Err(AppError::license_expired());
        }

        let admission = match self.registry.admit(&user, &device, license.max_devices).await {
            Ok(admission) => admission,
            Err(e) if e.kind == ErrorKind::DeviceLimit => {
                warn!(
                    target: "licensor::audit",
                    action = "login_device_limit",
                    user_id = %user.id,
                    username = %truncate_identifier(&user.username),
                    device = %device,
                    max_devices = license.max_devices,
                    "Login rejected at device limit"
                );
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        let action = if admission.reused_slot {
            "login_device_reauth"
        } else {
            "login_success"
        };
        info!(
            target: "licensor::audit",
            action,
            user_id = %user.id,
            username = %truncate_identifier(&user.username),
            device = %device,
            token = ?admission.session.token,
            device_bound_now,
            "Login successful"
        );

        Ok(LoginOutcome {
            session: admission.session,
            user,
            license,
            device_bound_now,
            reused_slot: admission.reused_slot,
        })
    }

    /// Check a token and return what its holder is entitled to.
    ///
    /// Never mutates state.
    pub async fn verify(&self, token: &str) -> AppResult<SessionView> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::invalid_input("token is required"));
        }

        let session = self
            .registry
            .find(token)
            .await?
            .ok_or_else(AppError::invalid_token)?;

        let now = self.clock.now();
        if session.is_timed_out(now, self.config.session_timeout()) {
            return Err(AppError::session_timeout());
        }

        match self.licenses.find_active_by_user(session.user_id).await? {
            Some(license) if !license.is_expired(now) => Ok(SessionView::project(&session, &license)),
            _ => Err(AppError::license_expired()),
        }
    }

    /// Record a heartbeat for `token`.
    pub async fn heartbeat(&self, token: &str, real_name: &str) -> AppResult<Session> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::invalid_input("token is required"));
        }

        self.registry
            .heartbeat(token, real_name.trim())
            .await?
            .ok_or_else(AppError::invalid_token)
    }

    /// End the session identified by `token`.
    pub async fn logout(&self, token: &str) -> AppResult<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::invalid_input("token is required"));
        }

        let session = self
            .registry
            .remove(token)
            .await?
            .ok_or_else(AppError::invalid_token)?;

        info!(
            target: "licensor::audit",
            action = "logout",
            user_id = %session.user_id,
            username = %truncate_identifier(&session.username),
            device = %session.device_id,
            "Logged out"
        );
        Ok(())
    }

    /// The session registry.
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use licensor_core::clock::ManualClock;
    use licensor_core::types::LicenseId;
    use licensor_database::Stores;
    use licensor_entity::license::LicenseStatus;
    use licensor_entity::user::UserStatus;

    struct Harness {
        manager: SessionManager,
        guard: Arc<DeviceBindingGuard>,
        stores: Stores,
        clock: Arc<ManualClock>,
    }

    fn harness() -> Harness {
        let stores = Stores::in_memory();
        let clock = Arc::new(ManualClock::starting_now());
        let config = SessionConfig::default();
        let locks = Arc::new(UserLocks::new());
        let registry = Arc::new(SessionRegistry::new(
            stores.sessions.clone(),
            clock.clone(),
            &config,
        ));
        let guard = Arc::new(DeviceBindingGuard::new(
            stores.users.clone(),
            registry.clone(),
            locks.clone(),
            clock.clone(),
        ));
        let manager = SessionManager::new(
            stores.users.clone(),
            stores.licenses.clone(),
            registry,
            guard.clone(),
            locks,
            PasswordHasher::fast(),
            clock.clone(),
            config,
        );
        Harness {
            manager,
            guard,
            stores,
            clock,
        }
    }

    impl Harness {
        async fn add_user(&self, name: &str, max_devices: u32, days: i64) -> User {
            let now = self.clock.now();
            let hash = PasswordHasher::fast().hash_password("secret1").unwrap();
            let user = User::new(name, hash, None, now);
            self.stores.users.insert(user.clone()).await.unwrap();
            self.stores
                .licenses
                .insert(License {
                    id: LicenseId::new(),
                    user_id: user.id,
                    license_key: "k".into(),
                    expire_date: now + Duration::days(days),
                    max_windows: 4,
                    max_devices,
                    max_daily_hours: 24,
                    status: LicenseStatus::Active,
                    created_at: now,
                    updated_at: None,
                })
                .await
                .unwrap();
            user
        }

        /// Drop the binding without evicting, so one account can hold
        /// several live devices.
        async fn clear_binding(&self, user: &User) {
            let mut stored = self.stores.users.find_by_id(user.id).await.unwrap().unwrap();
            stored.bound_device_id = None;
            self.stores.users.update(stored).await.unwrap();
        }

        async fn login(&self, name: &str, device: &str) -> AppResult<LoginOutcome> {
            self.manager.login(name, "secret1", device).await
        }
    }

    #[tokio::test]
    async fn test_alice_scenario() {
        let h = harness();
        h.add_user("alice", 1, 30).await;

        let first = h.login("alice", "D1").await.unwrap();
        assert!(first.device_bound_now);
        let t1 = first.session.token.clone();

        let err = h.login("alice", "D2").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::DeviceBound);
        let details = err.details.unwrap();
        assert_eq!(details["bound_device_id"], "D1...");
        assert_eq!(details["current_device_id"], "D2...");

        let hb = h.manager.heartbeat(t1.as_str(), "Alice").await.unwrap();
        assert_eq!(hb.daily_usage, 5);

        h.clock.advance(Duration::minutes(5));
        let second = h.login("alice", "D1").await.unwrap();
        assert!(!second.device_bound_now);
        assert_ne!(second.session.token, t1);
    }

    #[tokio::test]
    async fn test_logout_then_verify_is_invalid_token() {
        let h = harness();
        h.add_user("alice", 1, 30).await;
        let token = h.login("alice", "D1").await.unwrap().session.token;

        h.manager.verify(token.as_str()).await.unwrap();
        h.manager.logout(token.as_str()).await.unwrap();

        assert_eq!(
            h.manager.verify(token.as_str()).await.unwrap_err().kind,
            ErrorKind::InvalidToken
        );
        assert_eq!(
            h.manager.logout(token.as_str()).await.unwrap_err().kind,
            ErrorKind::InvalidToken
        );
    }

    #[tokio::test]
    async fn test_error_priority() {
        let h = harness();
        let user = h.add_user("alice", 1, 30).await;

        assert_eq!(
            h.manager.login("", "secret1", "D1").await.unwrap_err().kind,
            ErrorKind::InvalidInput
        );
        assert_eq!(
            h.manager.login("alice", "secret1", "  ").await.unwrap_err().kind,
            ErrorKind::InvalidInput
        );

        let unknown = h.manager.login("bob", "secret1", "D1").await.unwrap_err();
        let wrong = h.manager.login("alice", "nope", "D1").await.unwrap_err();
        assert_eq!(unknown.kind, ErrorKind::InvalidCredentials);
        assert_eq!(wrong.kind, ErrorKind::InvalidCredentials);
        assert_eq!(unknown.message, wrong.message);

        let mut disabled = user.clone();
        disabled.status = UserStatus::Disabled;
        h.stores.users.update(disabled).await.unwrap();
        assert_eq!(
            h.login("alice", "D1").await.unwrap_err().kind,
            ErrorKind::AccountDisabled
        );
    }

    #[tokio::test]
    async fn test_license_checks_follow_binding() {
        let h = harness();
        let user = h.add_user("alice", 1, 30).await;
        h.stores.licenses.delete_by_user(user.id).await.unwrap();

        assert_eq!(
            h.login("alice", "D1").await.unwrap_err().kind,
            ErrorKind::NoLicense
        );
        let stored = h.stores.users.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.bound_device_id, Some(DeviceId::new("D1")));

        assert_eq!(
            h.login("alice", "D2").await.unwrap_err().kind,
            ErrorKind::DeviceBound
        );
    }

    #[tokio::test]
    async fn test_expired_license() {
        let h = harness();
        h.add_user("alice", 1, 1).await;
        let token = h.login("alice", "D1").await.unwrap().session.token;

        h.clock.advance(Duration::days(1) + Duration::seconds(1));
        h.manager.heartbeat(token.as_str(), "").await.unwrap();
        assert_eq!(
            h.manager.verify(token.as_str()).await.unwrap_err().kind,
            ErrorKind::LicenseExpired
        );
        assert_eq!(
            h.login("alice", "D1").await.unwrap_err().kind,
            ErrorKind::LicenseExpired
        );
    }

    #[tokio::test]
    async fn test_device_limit_and_slot_reuse() {
        let h = harness();
        let user = h.add_user("carol", 2, 30).await;

        h.login("carol", "D1").await.unwrap();
        h.clear_binding(&user).await;
        h.login("carol", "D2").await.unwrap();
        h.clear_binding(&user).await;

        let err = h.login("carol", "D3").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::DeviceLimit);

        h.clear_binding(&user).await;
        let again = h.login("carol", "D2").await.unwrap();
        assert!(again.reused_slot);
        assert_eq!(h.manager.registry().list_live().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_verify_session_timeout_window() {
        let h = harness();
        h.add_user("alice", 1, 30).await;
        let token = h.login("alice", "D1").await.unwrap().session.token;

        h.clock.advance(Duration::hours(1));
        let view = h.manager.verify(token.as_str()).await.unwrap();
        assert_eq!(view.username, "alice");
        assert_eq!(view.max_devices, 1);

        h.clock.advance(Duration::seconds(1));
        assert_eq!(
            h.manager.verify(token.as_str()).await.unwrap_err().kind,
            ErrorKind::SessionTimeout
        );
    }

    #[tokio::test]
    async fn test_unbind_then_login_rebinds() {
        let h = harness();
        let user = h.add_user("alice", 1, 30).await;
        let token = h.login("alice", "D1").await.unwrap().session.token;

        let outcome = h.guard.unbind(user.id).await.unwrap();
        assert_eq!(outcome.evicted, 1);
        assert_eq!(
            h.manager.verify(token.as_str()).await.unwrap_err().kind,
            ErrorKind::InvalidToken
        );

        let second = h.login("alice", "D2").await.unwrap();
        assert!(second.device_bound_now);
        assert_eq!(second.user.bound_device_id, Some(DeviceId::new("D2")));
        assert_eq!(
            h.login("alice", "D1").await.unwrap_err().kind,
            ErrorKind::DeviceBound
        );
    }

    #[tokio::test]
    async fn test_verify_does_not_mutate() {
        let h = harness();
        h.add_user("alice", 1, 30).await;
        let token = h.login("alice", "D1").await.unwrap().session.token;
        let before = h.stores.sessions.load_all().await.unwrap();

        h.clock.advance(Duration::minutes(10));
        h.manager.verify(token.as_str()).await.unwrap();

        let after = h.stores.sessions.load_all().await.unwrap();
        assert_eq!(before.len(), after.len());
        assert_eq!(before[0].last_heartbeat, after[0].last_heartbeat);
    }

    #[tokio::test]
    async fn test_concurrent_logins_same_device_keep_one_slot() {
        let h = Arc::new(harness());
        h.add_user("alice", 1, 30).await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let h = Arc::clone(&h);
            handles.push(tokio::spawn(async move { h.login("alice", "D1").await.is_ok() }));
        }
        for handle in handles {
            assert!(handle.await.unwrap());
        }
        assert_eq!(h.manager.registry().list_live().await.unwrap().len(), 1);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[tokio::test]
    async fn test_audit_events_log_truncated_usernames() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .with_writer(move || writer.clone())
            .finish();
        let _default = tracing::subscriber::set_default(subscriber);

        let name = "a-rather-long-account-name";
        let h = harness();
        let user = h.add_user(name, 1, 30).await;

        let ok = h.login(name, "D1").await.unwrap();
        h.login(name, "D2").await.unwrap_err();
        h.manager.logout(ok.session.token.as_str()).await.unwrap();
        h.guard.unbind(user.id).await.unwrap();
        h.manager.login(name, "wrong-password", "D1").await.unwrap_err();

        let output = logs.contents();
        assert!(output.contains(&truncate_identifier(name)));
        assert!(!output.contains(name));
    }
}
