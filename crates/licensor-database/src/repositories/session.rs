//! Session repository implementation.

use async_trait::async_trait;

use licensor_core::result::AppResult;
use licensor_entity::session::Session;

use crate::collection::JsonCollection;
use crate::store::SessionStore;

/// Repository for the session set.
#[derive(Debug)]
pub struct SessionRepository {
    collection: JsonCollection<Session>,
}

impl SessionRepository {
    /// Wrap a collection.
    pub fn new(collection: JsonCollection<Session>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn load_all(&self) -> AppResult<Vec<Session>> {
        Ok(self.collection.snapshot().await)
    }

    async fn replace_all(&self, sessions: Vec<Session>) -> AppResult<()> {
        self.collection.replace(sessions).await
    }
}
