//! Shared fixture for service tests.

use std::sync::Arc;

use licensor_auth::{
    DeviceBindingGuard, PasswordHasher, PasswordValidator, SessionManager, SessionRegistry,
    UserLocks,
};
use licensor_core::clock::{Clock, ManualClock};
use licensor_core::config::{AuthConfig, LicenseConfig, SessionConfig};
use licensor_core::types::UserId;
use licensor_database::Stores;

use crate::account::AccountAdminService;
use crate::license::LicenseAdminService;
use crate::session::SessionAdminService;
use crate::user::{AdminUserService, CreateUserRequest};

pub(crate) struct Fixture {
    pub stores: Stores,
    pub clock: Arc<ManualClock>,
    pub manager: SessionManager,
    pub users: AdminUserService,
    pub licenses: LicenseAdminService,
    pub sessions: SessionAdminService,
    pub accounts: AccountAdminService,
}

impl Fixture {
    pub fn new() -> Self {
        let stores = Stores::in_memory();
        let manual = Arc::new(ManualClock::starting_now());
        let clock: Arc<dyn Clock> = manual.clone();
        let config = SessionConfig::default();
        let locks = Arc::new(UserLocks::new());
        let hasher = PasswordHasher::fast();

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
            registry.clone(),
            guard.clone(),
            locks.clone(),
            hasher.clone(),
            clock.clone(),
            config,
        );
        let users = AdminUserService::new(
            stores.users.clone(),
            stores.licenses.clone(),
            stores.accounts.clone(),
            registry.clone(),
            guard,
            locks.clone(),
            hasher,
            PasswordValidator::new(&AuthConfig::default()),
            LicenseConfig::default(),
            clock.clone(),
        );
        let licenses = LicenseAdminService::new(
            stores.users.clone(),
            stores.licenses.clone(),
            locks.clone(),
            clock.clone(),
        );
        let accounts = AccountAdminService::new(
            stores.users.clone(),
            stores.licenses.clone(),
            stores.accounts.clone(),
            locks.clone(),
            clock.clone(),
        );
        let sessions = SessionAdminService::new(registry, locks, clock, true);

        Self {
            stores,
            clock: manual,
            manager,
            users,
            licenses,
            sessions,
            accounts,
        }
    }

    /// Create a user with password `secret1` and default license terms.
    pub async fn create(&self, username: &str) -> UserId {
        self.users
            .create_user(CreateUserRequest {
                username: username.into(),
                password: "secret1".into(),
                ..Default::default()
            })
            .await
            .expect("create user")
            .user_id
    }
}
