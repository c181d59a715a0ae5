//! Account assignment repository implementation.

use async_trait::async_trait;

use licensor_core::result::AppResult;
use licensor_core::types::UserId;
use licensor_entity::account::AccountAssignment;

use crate::collection::JsonCollection;
use crate::store::AccountStore;

/// Repository for per-user account assignments.
#[derive(Debug)]
pub struct AccountRepository {
    collection: JsonCollection<AccountAssignment>,
}

impl AccountRepository {
    /// Wrap a collection.
    pub fn new(collection: JsonCollection<AccountAssignment>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn find_by_user(&self, user_id: UserId) -> AppResult<Option<AccountAssignment>> {
        Ok(self
            .collection
            .read(|assignments| assignments.iter().find(|a| a.user_id == user_id).cloned())
            .await)
    }

    async fn upsert(&self, assignment: AccountAssignment) -> AppResult<()> {
        self.collection
            .mutate(|assignments| {
                match assignments.iter_mut().find(|a| a.user_id == assignment.user_id) {
                    Some(slot) => *slot = assignment,
                    None => assignments.push(assignment),
                }
                Ok(())
            })
            .await
    }

    async fn delete_by_user(&self, user_id: UserId) -> AppResult<bool> {
        self.collection
            .mutate(|assignments| {
                let before = assignments.len();
                assignments.retain(|a| a.user_id != user_id);
                Ok(assignments.len() != before)
            })
            .await
    }
}
