//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod license;
pub mod logging;
pub mod session;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::auth::AuthConfig;
pub use self::license::LicenseConfig;
pub use self::logging::LoggingConfig;
pub use self::session::{MIN_TOKEN_BYTES, SessionConfig};
pub use self::storage::{StorageBackend, StorageConfig};

use crate::error::AppError;

/// Root application configuration.
///
/// Top-level deserialization target for the merged TOML configuration files
/// (default file + environment overlay + `LICENSOR__` environment variables).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Persistence settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Session liveness settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// License issuance defaults.
    #[serde(default)]
    pub license: LicenseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Reads `path` (optional), then `config/{env}` as an overlay, then
    /// environment variables prefixed with `LICENSOR__`, and validates the
    /// result.
    pub fn load(path: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("LICENSOR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string and validate it.
    pub fn from_toml_str(toml: &str) -> Result<Self, AppError> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the authority cannot run safely with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.admin_key.trim().is_empty() {
            return Err(AppError::configuration("auth.admin_key must be set"));
        }
        if self.session.token_bytes < MIN_TOKEN_BYTES {
            return Err(AppError::configuration(format!(
                "session.token_bytes must be at least {MIN_TOKEN_BYTES}"
            )));
        }
        if self.session.heartbeat_timeout_seconds == 0 {
            return Err(AppError::configuration(
                "session.heartbeat_timeout_seconds must be positive",
            ));
        }
        if self.session.session_timeout_seconds < self.session.heartbeat_timeout_seconds {
            return Err(AppError::configuration(
                "session.session_timeout_seconds must not be shorter than the heartbeat timeout",
            ));
        }
        Ok(())
    }
}
