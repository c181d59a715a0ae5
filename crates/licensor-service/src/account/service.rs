//! Account assignment: the administrator stores account lines per user and a
//! licensed client reads its own back.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use licensor_auth::UserLocks;
use licensor_core::clock::Clock;
use licensor_core::error::AppError;
use licensor_core::result::AppResult;
use licensor_core::types::{UserId, truncate_identifier};
use licensor_database::store::{AccountStore, LicenseStore, UserStore};
use licensor_entity::account::{AccountAssignment, AccountEntry};
use licensor_entity::user::User;

/// Result of replacing a user's account list.
#[derive(Debug, Clone, Serialize)]
pub struct AccountsUpdated {
    /// Owning user's login name.
    pub username: String,
    /// Lines kept after dropping blanks and comments.
    pub account_count: usize,
}

/// Stores and serves per-user account lists.
#[derive(Debug, Clone)]
pub struct AccountAdminService {
    users: Arc<dyn UserStore>,
    licenses: Arc<dyn LicenseStore>,
    accounts: Arc<dyn AccountStore>,
    locks: Arc<UserLocks>,
    clock: Arc<dyn Clock>,
}

impl AccountAdminService {
    /// Creates a new account service.
    pub fn new(
        users: Arc<dyn UserStore>,
        licenses: Arc<dyn LicenseStore>,
        accounts: Arc<dyn AccountStore>,
        locks: Arc<UserLocks>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            licenses,
            accounts,
            locks,
            clock,
        }
    }

    /// Replaces the account list of `user_id` with the lines of `text`.
    ///
    /// Blank lines and lines starting with `#` are dropped. An empty result
    /// still replaces the previous list.
    pub async fn set_accounts(&self, user_id: UserId, text: &str) -> AppResult<AccountsUpdated> {
        let _user_guard = self.locks.lock(user_id).await;
        let user = self.find(user_id).await?;

        let assignment = AccountAssignment::from_text(user_id, text, self.clock.now());
        let account_count = assignment.lines.len();
        self.accounts.upsert(assignment).await?;

        info!(
            target: "licensor::audit",
            action = "set_user_accounts",
            user_id = %user_id,
            username = %truncate_identifier(&user.username),
            account_count,
            "Replaced assigned accounts"
        );
        Ok(AccountsUpdated {
            username: user.username,
            account_count,
        })
    }

    /// The stored lines of `user_id` as editable text, empty when none were set.
    pub async fn accounts_text(&self, user_id: UserId) -> AppResult<String> {
        self.find(user_id).await?;
        Ok(self
            .accounts
            .find_by_user(user_id)
            .await?
            .map(|a| a.text())
            .unwrap_or_default())
    }

    /// The parsed entries handed to a client of `user_id`.
    ///
    /// Requires an active, unexpired license.
    pub async fn assigned_accounts(&self, user_id: UserId) -> AppResult<Vec<AccountEntry>> {
        self.find(user_id).await?;

        let now = self.clock.now();
        match self.licenses.find_active_by_user(user_id).await? {
            Some(license) if !license.is_expired(now) => {}
            _ => return Err(AppError::license_expired()),
        }

        Ok(self
            .accounts
            .find_by_user(user_id)
            .await?
            .map(|a| a.entries())
            .unwrap_or_default())
    }

    async fn find(&self, user_id: UserId) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
    }
}
