//! Store traits consumed by the auth and service layers.
//!
//! Every mutation is a read-modify-write that either persists completely or
//! fails with a `Storage` error and leaves the previous state visible.

use async_trait::async_trait;

use licensor_core::result::AppResult;
use licensor_core::types::{LicenseId, UserId};
use licensor_entity::account::AccountAssignment;
use licensor_entity::license::License;
use licensor_entity::session::Session;
use licensor_entity::user::User;

/// Credential store.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug {
    /// Find a user by id.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Find a user by exact username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// All users, oldest first.
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Insert a new user. Fails with `Conflict` on a duplicate username.
    async fn insert(&self, user: User) -> AppResult<()>;

    /// Replace an existing user record. Fails with `NotFound` if absent.
    async fn update(&self, user: User) -> AppResult<()>;

    /// Delete a user. Returns whether a record was removed.
    async fn delete(&self, id: UserId) -> AppResult<bool>;
}

/// License store.
#[async_trait]
pub trait LicenseStore: Send + Sync + std::fmt::Debug {
    /// The active license of a user, if any.
    async fn find_active_by_user(&self, user_id: UserId) -> AppResult<Option<License>>;

    /// All licenses.
    async fn list(&self) -> AppResult<Vec<License>>;

    /// Insert a new license.
    async fn insert(&self, license: License) -> AppResult<()>;

    /// Replace an existing license record. Fails with `NotFound` if absent.
    async fn update(&self, license: License) -> AppResult<()>;

    /// Delete a single license.
    async fn delete(&self, id: LicenseId) -> AppResult<bool>;

    /// Delete every license of a user. Returns how many were removed.
    async fn delete_by_user(&self, user_id: UserId) -> AppResult<usize>;
}

/// Session store.
///
/// Sessions are always written as a full set so a write reflects exactly the
/// surviving sessions computed by the caller.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    /// Every persisted session.
    async fn load_all(&self) -> AppResult<Vec<Session>>;

    /// Replace the persisted set with `sessions`.
    async fn replace_all(&self, sessions: Vec<Session>) -> AppResult<()>;
}

/// Account assignment store, one record per user.
#[async_trait]
pub trait AccountStore: Send + Sync + std::fmt::Debug {
    /// The assignment of a user, if one was ever set.
    async fn find_by_user(&self, user_id: UserId) -> AppResult<Option<AccountAssignment>>;

    /// Insert or replace the assignment of `assignment.user_id`.
    async fn upsert(&self, assignment: AccountAssignment) -> AppResult<()>;

    /// Delete the assignment of a user. Returns whether a record was removed.
    async fn delete_by_user(&self, user_id: UserId) -> AppResult<bool>;
}
