//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use licensor_auth::{
    DeviceBindingGuard, PasswordHasher, PasswordValidator, SessionManager, SessionRegistry,
    UserLocks,
};
use licensor_core::clock::Clock;
use licensor_core::config::AppConfig;
use licensor_database::Stores;
use licensor_service::{
    AccountAdminService, AdminUserService, LicenseAdminService, SessionAdminService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Client session lifecycle
    pub session_manager: Arc<SessionManager>,
    /// Admin user operations
    pub admin_users: Arc<AdminUserService>,
    /// Admin license operations
    pub admin_licenses: Arc<LicenseAdminService>,
    /// Admin session operations
    pub admin_sessions: Arc<SessionAdminService>,
    /// Account assignment, admin writes and client reads
    pub admin_accounts: Arc<AccountAdminService>,
    /// Process start, for the health check
    pub started_at: Instant,
}

impl AppState {
    /// Wire the authority and admin services over `stores`.
    pub fn new(
        config: AppConfig,
        stores: Stores,
        clock: Arc<dyn Clock>,
        hasher: PasswordHasher,
    ) -> Self {
        let locks = Arc::new(UserLocks::new());
        let registry = Arc::new(SessionRegistry::new(
            Arc::clone(&stores.sessions),
            Arc::clone(&clock),
            &config.session,
        ));
        let guard = Arc::new(DeviceBindingGuard::new(
            Arc::clone(&stores.users),
            Arc::clone(&registry),
            Arc::clone(&locks),
            Arc::clone(&clock),
        ));

        let session_manager = Arc::new(SessionManager::new(
            Arc::clone(&stores.users),
            Arc::clone(&stores.licenses),
            Arc::clone(&registry),
            Arc::clone(&guard),
            Arc::clone(&locks),
            hasher.clone(),
            Arc::clone(&clock),
            config.session.clone(),
        ));

        let admin_users = Arc::new(AdminUserService::new(
            Arc::clone(&stores.users),
            Arc::clone(&stores.licenses),
            Arc::clone(&stores.accounts),
            Arc::clone(&registry),
            guard,
            Arc::clone(&locks),
            hasher,
            PasswordValidator::new(&config.auth),
            config.license.clone(),
            Arc::clone(&clock),
        ));
        let admin_licenses = Arc::new(LicenseAdminService::new(
            Arc::clone(&stores.users),
            Arc::clone(&stores.licenses),
            Arc::clone(&locks),
            Arc::clone(&clock),
        ));
        let admin_accounts = Arc::new(AccountAdminService::new(
            Arc::clone(&stores.users),
            Arc::clone(&stores.licenses),
            Arc::clone(&stores.accounts),
            Arc::clone(&locks),
            Arc::clone(&clock),
        ));
        let admin_sessions = Arc::new(SessionAdminService::new(
            registry,
            locks,
            clock,
            config.session.sweep_on_admin_request,
        ));

        Self {
            config: Arc::new(config),
            session_manager,
            admin_users,
            admin_licenses,
            admin_sessions,
            admin_accounts,
            started_at: Instant::now(),
        }
    }
}
