//! Opening the configured store backend.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use licensor_core::config::{StorageBackend, StorageConfig};
use licensor_core::result::AppResult;

use crate::collection::JsonCollection;
use licensor_entity::account::AccountAssignment;
use licensor_entity::license::License;
use licensor_entity::session::Session;
use licensor_entity::user::User;

use crate::repositories::{
    AccountRepository, LicenseRepository, SessionRepository, UserRepository,
};
use crate::store::{AccountStore, LicenseStore, SessionStore, UserStore};

/// The stores the authority runs against.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Credential store.
    pub users: Arc<dyn UserStore>,
    /// License store.
    pub licenses: Arc<dyn LicenseStore>,
    /// Session store.
    pub sessions: Arc<dyn SessionStore>,
    /// Account assignment store.
    pub accounts: Arc<dyn AccountStore>,
}

impl Stores {
    /// Open the backend selected by `config`.
    pub async fn open(config: &StorageConfig) -> AppResult<Self> {
        info!(backend = %config.backend, data_dir = %config.data_dir.display(), "Opening stores");

        match config.backend {
            StorageBackend::Memory => Ok(Self::in_memory()),
            StorageBackend::File => {
                let dir = config.data_dir.as_path();
                Ok(Self {
                    users: Arc::new(UserRepository::new(JsonCollection::open("users", dir).await?)),
                    licenses: Arc::new(LicenseRepository::new(
                        JsonCollection::open("licenses", dir).await?,
                    )),
                    sessions: Arc::new(SessionRepository::new(
                        JsonCollection::open("sessions", dir).await?,
                    )),
                    accounts: Arc::new(AccountRepository::new(
                        JsonCollection::open("accounts", dir).await?,
                    )),
                })
            }
        }
    }

    /// Fresh, empty, process-local stores.
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(UserRepository::new(JsonCollection::in_memory("users"))),
            licenses: Arc::new(LicenseRepository::new(JsonCollection::in_memory("licenses"))),
            sessions: Arc::new(SessionRepository::new(JsonCollection::in_memory("sessions"))),
            accounts: Arc::new(AccountRepository::new(JsonCollection::in_memory("accounts"))),
        }
    }
}

/// Create `dir` and any missing collection files in it.
///
/// Existing files are left untouched. Returns the files that were created.
pub async fn initialize_data_dir(dir: &Path) -> AppResult<Vec<PathBuf>> {
    let users = JsonCollection::<User>::open("users", dir).await?;
    let licenses = JsonCollection::<License>::open("licenses", dir).await?;
    let sessions = JsonCollection::<Session>::open("sessions", dir).await?;
    let accounts = JsonCollection::<AccountAssignment>::open("accounts", dir).await?;

    let mut created = Vec::new();
    if users.ensure_file().await? {
        created.extend(users.path().map(Path::to_path_buf));
    }
    if licenses.ensure_file().await? {
        created.extend(licenses.path().map(Path::to_path_buf));
    }
    if sessions.ensure_file().await? {
        created.extend(sessions.path().map(Path::to_path_buf));
    }
    if accounts.ensure_file().await? {
        created.extend(accounts.path().map(Path::to_path_buf));
    }
    Ok(created)
}
