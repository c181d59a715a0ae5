//! Session management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use licensor_core::error::AppError;
use licensor_service::SessionSummary;

use super::Context;
use crate::output::{self, OutputFormat};

/// Arguments for session commands
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Session subcommand
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session subcommands
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// List live sessions
    List,
    /// End every session of a user
    Kick {
        /// Username
        username: String,
    },
    /// Remove sessions past the heartbeat timeout
    Clean,
}

/// Session display row for table output
#[derive(Debug, Serialize, Tabled)]
struct SessionRow {
    /// Token prefix
    token: String,
    /// Username
    username: String,
    /// Client-reported name
    real_name: String,
    /// Truncated device id
    device: String,
    /// Login time
    login_time: String,
    /// Seconds idle
    idle_seconds: i64,
    /// Usage minutes
    usage_minutes: u32,
}

impl From<&SessionSummary> for SessionRow {
    fn from(session: &SessionSummary) -> Self {
        Self {
            token: session.token.clone(),
            username: session.username.clone(),
            real_name: session.real_name.clone(),
            device: session.device_id.clone(),
            login_time: output::format_time(Some(session.login_time)),
            idle_seconds: session.idle_seconds,
            usage_minutes: session.daily_usage,
        }
    }
}

/// Execute session commands
pub async fn execute(
    args: &SessionArgs,
    ctx: &Context,
    format: OutputFormat,
) -> Result<(), AppError> {
    let sessions = &ctx.state.admin_sessions;

    match &args.command {
        SessionCommand::List => {
            let live = sessions.list_sessions().await?;
            match format {
                OutputFormat::Json => output::print_record(&live, format),
                OutputFormat::Table => {
                    let rows: Vec<SessionRow> = live.iter().map(SessionRow::from).collect();
                    output::print_list(&rows, format);
                }
            }
        }
        SessionCommand::Kick { username } => {
            let user_id = ctx.resolve_user(username).await?;
            let kicked = sessions.kick_user(user_id).await?;
            output::print_success(&format!("Kicked {kicked} sessions of '{username}'"));
        }
        SessionCommand::Clean => {
            let report = sessions.clean_sessions().await?;
            output::print_record(&report, format);
            output::print_success(&format!("Removed {} expired sessions", report.removed));
        }
    }

    Ok(())
}
