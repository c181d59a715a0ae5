//! User management CLI commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use licensor_core::error::{AppError, ErrorKind};
use licensor_entity::user::UserStatus;
use licensor_service::{CreateUserRequest, UserSummary};

use super::Context;
use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a user with an active license
    Create {
        /// Username
        username: String,
        /// Initial password
        #[arg(short, long)]
        password: String,
        /// Email address
        #[arg(long)]
        email: Option<String>,
        /// Days until the license expires
        #[arg(long)]
        expire_days: Option<u32>,
        /// Window quota
        #[arg(long)]
        max_windows: Option<u32>,
        /// Concurrent device cap
        #[arg(long, alias = "max-devices")]
        max_simulators: Option<u32>,
        /// Daily allowance in hours
        #[arg(long)]
        max_daily_hours: Option<u32>,
    },
    /// List all users
    List,
    /// Delete a user with its licenses and sessions
    Delete {
        /// Username
        username: String,
    },
    /// Enable a user
    Enable {
        /// Username
        username: String,
    },
    /// Disable a user and end its sessions
    Disable {
        /// Username
        username: String,
    },
    /// Clear the device binding and end its sessions
    Unbind {
        /// Username
        username: String,
    },
    /// Set a new password
    ResetPassword {
        /// Username
        username: String,
        /// New password
        #[arg(short, long)]
        password: String,
    },
    /// Manage the accounts assigned to a user
    Accounts {
        /// Accounts subcommand
        #[command(subcommand)]
        command: AccountsCommand,
    },
}

/// Account assignment subcommands
#[derive(Debug, Subcommand)]
pub enum AccountsCommand {
    /// Replace the assigned accounts, one per line
    Set {
        /// Username
        username: String,
        /// Where the account lines come from
        #[command(flatten)]
        source: AccountsSource,
    },
    /// Print the assigned accounts
    Get {
        /// Username
        username: String,
    },
}

/// Inline text or a file, exactly one
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct AccountsSource {
    /// Account lines, separated by newlines
    #[arg(long)]
    pub text: Option<String>,
    /// File holding the account lines
    #[arg(long)]
    pub file: Option<PathBuf>,
}

impl AccountsSource {
    async fn read(&self) -> Result<String, AppError> {
        match (&self.text, &self.file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => tokio::fs::read_to_string(path).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::InvalidInput,
                    format!("Failed to read {}", path.display()),
                    e,
                )
            }),
            (None, None) => Err(AppError::invalid_input("--text or --file is required")),
        }
    }
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// Username
    username: String,
    /// Status
    status: String,
    /// License expiry
    expires: String,
    /// Device cap
    max_simulators: String,
    /// Live sessions
    online: usize,
    /// Bound device
    bound_device: String,
    /// Created at
    created_at: String,
}

impl From<&UserSummary> for UserRow {
    fn from(user: &UserSummary) -> Self {
        let (expires, max_simulators) = match &user.license {
            Some(license) if license.expired => (
                format!("{} (expired)", output::format_time(Some(license.expire_date))),
                license.max_devices.to_string(),
            ),
            Some(license) => (
                output::format_time(Some(license.expire_date)),
                license.max_devices.to_string(),
            ),
            None => ("-".to_string(), "-".to_string()),
        };
        Self {
            username: user.username.clone(),
            status: user.status.to_string(),
            expires,
            max_simulators,
            online: user.online_devices,
            bound_device: user.bound_device_id.clone().unwrap_or_else(|| "-".to_string()),
            created_at: output::format_time(Some(user.created_at)),
        }
    }
}

/// Execute user commands
pub async fn execute(args: &UserArgs, ctx: &Context, format: OutputFormat) -> Result<(), AppError> {
    let users = &ctx.state.admin_users;

    match &args.command {
        UserCommand::Create {
            username,
            password,
            email,
            expire_days,
            max_windows,
            max_simulators,
            max_daily_hours,
        } => {
            let created = users
                .create_user(CreateUserRequest {
                    username: username.clone(),
                    password: password.clone(),
                    email: email.clone(),
                    expire_days: *expire_days,
                    max_windows: *max_windows,
                    max_devices: *max_simulators,
                    max_daily_hours: *max_daily_hours,
                })
                .await?;
            output::print_record(&created, format);
            output::print_success(&format!("User '{username}' created"));
        }
        UserCommand::List => {
            let summaries = users.list_users().await?;
            match format {
                OutputFormat::Json => output::print_record(&summaries, format),
                OutputFormat::Table => {
                    let rows: Vec<UserRow> = summaries.iter().map(UserRow::from).collect();
                    output::print_list(&rows, format);
                }
            }
        }
        UserCommand::Delete { username } => {
            let user_id = ctx.resolve_user(username).await?;
            users.delete_user(user_id).await?;
            output::print_success(&format!("User '{username}' deleted"));
        }
        UserCommand::Enable { username } => {
            let user_id = ctx.resolve_user(username).await?;
            users.set_status(user_id, UserStatus::Active).await?;
            output::print_success(&format!("User '{username}' enabled"));
        }
        UserCommand::Disable { username } => {
            let user_id = ctx.resolve_user(username).await?;
            users.set_status(user_id, UserStatus::Disabled).await?;
            output::print_success(&format!("User '{username}' disabled"));
        }
        UserCommand::Unbind { username } => {
            let user_id = ctx.resolve_user(username).await?;
            let outcome = users.unbind_device(user_id).await?;
            match outcome.previous {
                Some(device) => output::print_kv("previous device", &device.redacted()),
                None => output::print_warning("User had no bound device"),
            }
            output::print_kv("evicted sessions", &outcome.evicted.to_string());
            output::print_success(&format!("Device binding of '{username}' cleared"));
        }
        UserCommand::ResetPassword { username, password } => {
            let user_id = ctx.resolve_user(username).await?;
            users.reset_password(user_id, password).await?;
            output::print_success(&format!("Password of '{username}' reset"));
        }
        UserCommand::Accounts { command } => accounts(command, ctx, format).await?,
    }

    Ok(())
}

async fn accounts(command: &AccountsCommand, ctx: &Context, format: OutputFormat) -> Result<(), AppError> {
    let service = &ctx.state.admin_accounts;

    match command {
        AccountsCommand::Set { username, source } => {
            let user_id = ctx.resolve_user(username).await?;
            let text = source.read().await?;
            let updated = service.set_accounts(user_id, &text).await?;
            output::print_success(&format!(
                "Assigned {} accounts to '{username}'",
                updated.account_count
            ));
        }
        AccountsCommand::Get { username } => {
            let user_id = ctx.resolve_user(username).await?;
            let text = service.accounts_text(user_id).await?;
            match format {
                OutputFormat::Json => {
                    output::print_record(&serde_json::json!({ "accounts": text }), format)
                }
                OutputFormat::Table if text.is_empty() => {
                    output::print_warning(&format!("No accounts assigned to '{username}'"))
                }
                OutputFormat::Table => println!("{text}"),
            }
        }
    }
    Ok(())
}

