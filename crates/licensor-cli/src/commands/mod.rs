//! CLI command definitions and dispatch.
//!
//! Commands operate directly on the configured data directory through the
//! same services the HTTP API uses. Run them while the server is stopped:
//! the server keeps its own copy of each collection in memory.

pub mod init;
pub mod license;
pub mod session;
pub mod user;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use licensor_api::AppState;
use licensor_auth::PasswordHasher;
use licensor_core::clock::SystemClock;
use licensor_core::config::AppConfig;
use licensor_core::error::AppError;
use licensor_core::types::UserId;
use licensor_database::Stores;

use crate::output::OutputFormat;

/// Licensor: session and device licensing authority
#[derive(Debug, Parser)]
#[command(name = "licensor", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Configuration overlay name (`config/{env}.toml`)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the data directory and empty collections
    Init,
    /// User management
    User(user::UserArgs),
    /// License management
    License(license::LicenseArgs),
    /// Session management
    Session(session::SessionArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.config, &self.env)?;
        match &self.command {
            Commands::Init => init::execute(&config).await,
            Commands::User(args) => {
                user::execute(args, &Context::open(config).await?, self.format).await
            }
            Commands::License(args) => {
                license::execute(args, &Context::open(config).await?, self.format).await
            }
            Commands::Session(args) => {
                session::execute(args, &Context::open(config).await?, self.format).await
            }
        }
    }
}

/// Services wired over the configured stores.
pub struct Context {
    /// Admin services.
    pub state: AppState,
    /// Raw stores, for name lookups.
    pub stores: Stores,
}

impl Context {
    /// Open the stores named by `config` and wire the services over them.
    pub async fn open(config: AppConfig) -> Result<Self, AppError> {
        let stores = Stores::open(&config.storage).await?;
        let state = AppState::new(
            config,
            stores.clone(),
            Arc::new(SystemClock),
            PasswordHasher::new(),
        );
        Ok(Self { state, stores })
    }

    /// Resolve a login name to its user id.
    pub async fn resolve_user(&self, username: &str) -> Result<UserId, AppError> {
        self.stores
            .users
            .find_by_username(username)
            .await?
            .map(|user| user.id)
            .ok_or_else(|| AppError::not_found(format!("User '{username}' not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use licensor_service::CreateUserRequest;

    #[test]
    fn test_parse_user_create() {
        let cli = Cli::try_parse_from([
            "licensor",
            "--format",
            "json",
            "user",
            "create",
            "alice",
            "--password",
            "secret1",
            "--max-devices",
            "3",
        ])
        .expect("parse");
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::User(user::UserArgs {
                command: user::UserCommand::Create {
                    username,
                    max_simulators,
                    ..
                },
            }) => {
                assert_eq!(username, "alice");
                assert_eq!(max_simulators, Some(3));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_quota_requires_both_values() {
        let parsed = Cli::try_parse_from(["licensor", "license", "quota", "bob", "--max-windows", "2"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_accounts_set_needs_exactly_one_source() {
        let parsed = Cli::try_parse_from([
            "licensor", "user", "accounts", "set", "alice", "--file", "pool.txt",
        ])
        .expect("parse");
        match parsed.command {
            Commands::User(user::UserArgs {
                command: user::UserCommand::Accounts {
                    command: user::AccountsCommand::Set { username, source },
                },
            }) => {
                assert_eq!(username, "alice");
                assert_eq!(source.file.as_deref(), Some(std::path::Path::new("pool.txt")));
                assert!(source.text.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(Cli::try_parse_from(["licensor", "user", "accounts", "set", "alice"]).is_err());
        assert!(
            Cli::try_parse_from([
                "licensor", "user", "accounts", "set", "alice", "--text", "a----1", "--file", "x",
            ])
            .is_err()
        );
    }

    #[tokio::test]
    async fn test_accounts_set_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let toml = format!(
            "[auth]\nadmin_key = \"k\"\n[storage]\ndata_dir = {:?}\n",
            dir.path().join("data").display().to_string()
        );
        let config = AppConfig::from_toml_str(&toml).expect("config");
        let ctx = Context::open(config).await.expect("open");
        ctx.state
            .admin_users
            .create_user(CreateUserRequest {
                username: "alice".to_string(),
                password: "secret1".to_string(),
                ..Default::default()
            })
            .await
            .expect("create");

        let pool = dir.path().join("pool.txt");
        std::fs::write(&pool, "# reserved\nacc1----pw1\n\nacc2----pw2\n").expect("write");
        let cli = Cli::try_parse_from([
            "licensor",
            "user",
            "accounts",
            "set",
            "alice",
            "--file",
            pool.to_str().expect("utf-8 path"),
        ])
        .expect("parse");
        let Commands::User(args) = &cli.command else {
            panic!("expected a user command");
        };
        user::execute(args, &ctx, OutputFormat::Json).await.expect("set");

        let user_id = ctx.resolve_user("alice").await.expect("resolve");
        let text = ctx.state.admin_accounts.accounts_text(user_id).await.expect("get");
        assert_eq!(text, "acc1----pw1\nacc2----pw2");
    }

    #[tokio::test]
    async fn test_context_resolves_users_in_data_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let toml = format!(
            "[auth]\nadmin_key = \"k\"\n[storage]\ndata_dir = {:?}\n",
            dir.path().display().to_string()
        );
        let config = AppConfig::from_toml_str(&toml).expect("config");

        let ctx = Context::open(config.clone()).await.expect("open");
        ctx.state
            .admin_users
            .create_user(CreateUserRequest {
                username: "alice".to_string(),
                password: "secret1".to_string(),
                ..Default::default()
            })
            .await
            .expect("create");

        let reopened = Context::open(config).await.expect("reopen");
        assert!(reopened.resolve_user("alice").await.is_ok());
        let err = reopened.resolve_user("nobody").await.expect_err("missing");
        assert_eq!(err.kind, licensor_core::error::ErrorKind::NotFound);
    }
}
