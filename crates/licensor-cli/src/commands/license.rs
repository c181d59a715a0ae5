//! License management CLI commands.

use clap::{Args, Subcommand};

use licensor_core::error::AppError;
use licensor_service::{LicenseSummary, UpdateLicenseRequest};

use super::Context;
use crate::output::{self, OutputFormat};

/// Arguments for license commands
#[derive(Debug, Args)]
pub struct LicenseArgs {
    /// License subcommand
    #[command(subcommand)]
    pub command: LicenseCommand,
}

/// License subcommands
#[derive(Debug, Subcommand)]
pub enum LicenseCommand {
    /// Push the expiry further out
    Extend {
        /// Username
        username: String,
        /// Days to add
        #[arg(short, long)]
        days: u32,
    },
    /// Reset license terms; omitted values are left alone
    Update {
        /// Username
        username: String,
        /// Expire this many days from now
        #[arg(long)]
        expire_days: Option<u32>,
        /// Concurrent device cap
        #[arg(long, alias = "max-devices")]
        max_simulators: Option<u32>,
        /// Daily allowance in hours
        #[arg(long)]
        max_daily_hours: Option<u32>,
    },
    /// Set window quota and device cap
    Quota {
        /// Username
        username: String,
        /// Window quota (1-20)
        #[arg(long)]
        max_windows: u32,
        /// Concurrent device cap (1-100)
        #[arg(long, alias = "max-devices")]
        max_simulators: u32,
    },
}

/// Execute license commands
pub async fn execute(
    args: &LicenseArgs,
    ctx: &Context,
    format: OutputFormat,
) -> Result<(), AppError> {
    let licenses = &ctx.state.admin_licenses;

    let (username, license) = match &args.command {
        LicenseCommand::Extend { username, days } => {
            let user_id = ctx.resolve_user(username).await?;
            (username, licenses.extend_time(user_id, *days).await?)
        }
        LicenseCommand::Update {
            username,
            expire_days,
            max_simulators,
            max_daily_hours,
        } => {
            let user_id = ctx.resolve_user(username).await?;
            let req = UpdateLicenseRequest {
                expire_days: *expire_days,
                max_devices: *max_simulators,
                max_daily_hours: *max_daily_hours,
            };
            (username, licenses.update_license(user_id, req).await?)
        }
        LicenseCommand::Quota {
            username,
            max_windows,
            max_simulators,
        } => {
            let user_id = ctx.resolve_user(username).await?;
            let license = licenses
                .update_quota(user_id, *max_windows, *max_simulators)
                .await?;
            (username, license)
        }
    };

    let summary = LicenseSummary::from_license(&license, chrono::Utc::now());
    output::print_record(&summary, format);
    output::print_success(&format!("License of '{username}' updated"));
    Ok(())
}
