//! License repository implementation.

use async_trait::async_trait;

use licensor_core::error::AppError;
use licensor_core::result::AppResult;
use licensor_core::types::{LicenseId, UserId};
use licensor_entity::license::License;

use crate::collection::JsonCollection;
use crate::store::LicenseStore;

/// Repository for license records.
#[derive(Debug)]
pub struct LicenseRepository {
    collection: JsonCollection<License>,
}

impl LicenseRepository {
    /// Wrap a collection.
    pub fn new(collection: JsonCollection<License>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl LicenseStore for LicenseRepository {
    async fn find_active_by_user(&self, user_id: UserId) -> AppResult<Option<License>> {
        Ok(self
            .collection
            .read(|licenses| {
                licenses
                    .iter()
                    .find(|l| l.user_id == user_id && l.is_active())
                    .cloned()
            })
            .await)
    }

    async fn list(&self) -> AppResult<Vec<License>> {
        Ok(self.collection.snapshot().await)
    }

    async fn insert(&self, license: License) -> AppResult<()> {
        self.collection
            .mutate(|licenses| {
                licenses.push(license);
                Ok(())
            })
            .await
    }

    async fn update(&self, license: License) -> AppResult<()> {
        self.collection
            .mutate(|licenses| {
                let slot = licenses
                    .iter_mut()
                    .find(|l| l.id == license.id)
                    .ok_or_else(|| {
                        AppError::not_found(format!("License {} not found", license.id))
                    })?;
                *slot = license;
                Ok(())
            })
            .await
    }

    async fn delete(&self, id: LicenseId) -> AppResult<bool> {
        self.collection
            .mutate(|licenses| {
                let before = licenses.len();
                licenses.retain(|l| l.id != id);
                Ok(licenses.len() != before)
            })
            .await
    }

    async fn delete_by_user(&self, user_id: UserId) -> AppResult<usize> {
        self.collection
            .mutate(|licenses| {
                let before = licenses.len();
                licenses.retain(|l| l.user_id != user_id);
                Ok(before - licenses.len())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use licensor_entity::license::LicenseStatus;

    fn license(user_id: UserId, status: LicenseStatus) -> License {
        License {
            id: LicenseId::new(),
            user_id,
            license_key: "k".into(),
            expire_date: Utc::now() + Duration::days(30),
            max_windows: 4,
            max_devices: 2,
            max_daily_hours: 24,
            status,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_inactive_licenses_are_skipped() {
        let repo = LicenseRepository::new(JsonCollection::in_memory("licenses"));
        let user = UserId::new();
        repo.insert(license(user, LicenseStatus::Inactive))
            .await
            .unwrap();
        assert!(repo.find_active_by_user(user).await.unwrap().is_none());

        let active = license(user, LicenseStatus::Active);
        repo.insert(active.clone()).await.unwrap();
        let found = repo.find_active_by_user(user).await.unwrap().unwrap();
        assert_eq!(found.id, active.id);
    }

    #[tokio::test]
    async fn test_delete_by_user_removes_only_that_user() {
        let repo = LicenseRepository::new(JsonCollection::in_memory("licenses"));
        let a = UserId::new();
        let b = UserId::new();
        repo.insert(license(a, LicenseStatus::Active)).await.unwrap();
        repo.insert(license(a, LicenseStatus::Inactive)).await.unwrap();
        repo.insert(license(b, LicenseStatus::Active)).await.unwrap();

        assert_eq!(repo.delete_by_user(a).await.unwrap(), 2);
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }
}
