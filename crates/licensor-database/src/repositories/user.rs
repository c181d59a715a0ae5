//! User repository implementation.

use async_trait::async_trait;

use licensor_core::error::AppError;
use licensor_core::result::AppResult;
use licensor_core::types::UserId;
use licensor_entity::user::User;

use crate::collection::JsonCollection;
use crate::store::UserStore;

/// Repository for user records.
#[derive(Debug)]
pub struct UserRepository {
    collection: JsonCollection<User>,
}

impl UserRepository {
    /// Wrap a collection.
    pub fn new(collection: JsonCollection<User>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self
            .collection
            .read(|users| users.iter().find(|u| u.id == id).cloned())
            .await)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .collection
            .read(|users| users.iter().find(|u| u.username == username).cloned())
            .await)
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let mut users = self.collection.snapshot().await;
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn insert(&self, user: User) -> AppResult<()> {
        self.collection
            .mutate(|users| {
                if users.iter().any(|u| u.username == user.username) {
                    return Err(AppError::conflict(format!(
                        "Username '{}' already exists",
                        user.username
                    )));
                }
                users.push(user);
                Ok(())
            })
            .await
    }

    async fn update(&self, user: User) -> AppResult<()> {
        self.collection
            .mutate(|users| {
                let slot = users
                    .iter_mut()
                    .find(|u| u.id == user.id)
                    .ok_or_else(|| AppError::not_found(format!("User {} not found", user.id)))?;
                *slot = user;
                Ok(())
            })
            .await
    }

    async fn delete(&self, id: UserId) -> AppResult<bool> {
        self.collection
            .mutate(|users| {
                let before = users.len();
                users.retain(|u| u.id != id);
                Ok(users.len() != before)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use licensor_core::error::ErrorKind;

    fn repo() -> UserRepository {
        UserRepository::new(JsonCollection::in_memory("users"))
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let repo = repo();
        repo.insert(User::new("alice", "h", None, Utc::now()))
            .await
            .unwrap();
        let err = repo
            .insert(User::new("alice", "h2", None, Utc::now()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = repo();
        let mut user = User::new("bob", "h", None, Utc::now());
        repo.insert(user.clone()).await.unwrap();

        user.email = Some("bob@example.com".into());
        repo.update(user.clone()).await.unwrap();
        let found = repo.find_by_username("bob").await.unwrap().unwrap();
        assert_eq!(found.email.as_deref(), Some("bob@example.com"));

        assert!(repo.delete(user.id).await.unwrap());
        assert!(!repo.delete(user.id).await.unwrap());
        assert!(repo.find_by_id(user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let err = repo()
            .update(User::new("ghost", "h", None, Utc::now()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
