//! Per-user mutual exclusion.
//!
//! Login, unbind, kick and delete for the same user are serialized through
//! one async mutex per user id, so an administrator's eviction can never be
//! undone by a login that read the session set before it. Callers that also
//! need the registry lock must take the user lock first.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use licensor_core::types::UserId;

/// Table of per-user async locks.
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl UserLocks {
    /// Creates an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `user_id`.
    pub async fn lock(&self, user_id: UserId) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the shard guard is released before awaiting.
        let lock = self
            .locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Drops the lock entry of a deleted user.
    pub fn forget(&self, user_id: UserId) {
        self.locks.remove(&user_id);
    }

    /// Number of users with a lock entry.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no user has a lock entry.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_user_is_serialized() {
        let locks = Arc::new(UserLocks::new());
        let user = UserId::new();

        let guard = locks.lock(user).await;
        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _g = locks.lock(user).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .expect("contender acquires after release")
            .unwrap();
    }

    #[tokio::test]
    async fn test_different_users_do_not_block() {
        let locks = UserLocks::new();
        let _a = locks.lock(UserId::new()).await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.lock(UserId::new())).await;
        assert!(b.is_ok());
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_forget_removes_entry() {
        let locks = UserLocks::new();
        let user = UserId::new();
        drop(locks.lock(user).await);
        locks.forget(user);
        assert!(locks.is_empty());
    }
}
