//! Account assignment model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use licensor_core::types::UserId;

/// Separates the account user from the rest of an assignment line.
pub const ACCOUNT_SEPARATOR: &str = "----";

/// The account lines an administrator handed to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAssignment {
    /// Owning user.
    pub user_id: UserId,
    /// Trimmed lines, blanks and `#` comments removed, in submission order.
    pub lines: Vec<String>,
    /// When the list was last replaced.
    pub updated_at: DateTime<Utc>,
}

/// One assigned account as handed to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEntry {
    /// The text before the first separator.
    pub c_user: String,
    /// The whole stored line.
    pub account_line: String,
}

impl AccountAssignment {
    /// Build an assignment from free text, one account per line.
    pub fn from_text(user_id: UserId, text: &str, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            lines: parse_lines(text),
            updated_at: now,
        }
    }

    /// The stored lines joined back into editable text.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Split every line into its account user and the full line.
    ///
    /// Lines with nothing before the first separator are skipped.
    pub fn entries(&self) -> Vec<AccountEntry> {
        self.lines
            .iter()
            .filter_map(|line| {
                let c_user = line.split(ACCOUNT_SEPARATOR).next().unwrap_or_default();
                (!c_user.is_empty()).then(|| AccountEntry {
                    c_user: c_user.to_string(),
                    account_line: line.clone(),
                })
            })
            .collect()
    }
}

fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
