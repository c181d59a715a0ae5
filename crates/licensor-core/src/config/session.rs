//! Session liveness and token configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Session management configuration.
///
/// Two independent windows exist. `heartbeat_timeout_seconds` decides whether
/// a session still occupies a device slot; `session_timeout_seconds` decides
/// how long its token keeps passing `verify` when heartbeats lag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seconds without a heartbeat after which a session is dead.
    #[serde(default = "default_heartbeat_timeout")]
    pub heartbeat_timeout_seconds: u64,
    /// Seconds without a heartbeat after which `verify` rejects the token.
    #[serde(default = "default_session_timeout")]
    pub session_timeout_seconds: u64,
    /// Minutes of usage credited per heartbeat.
    #[serde(default = "default_heartbeat_usage")]
    pub heartbeat_usage_minutes: u32,
    /// Random bytes per session token (hex-encoded on the wire).
    #[serde(default = "default_token_bytes")]
    pub token_bytes: usize,
    /// Run a liveness sweep at the start of every administrative request.
    #[serde(default = "default_true")]
    pub sweep_on_admin_request: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            heartbeat_timeout_seconds: default_heartbeat_timeout(),
            session_timeout_seconds: default_session_timeout(),
            heartbeat_usage_minutes: default_heartbeat_usage(),
            token_bytes: default_token_bytes(),
            sweep_on_admin_request: true,
        }
    }
}

impl SessionConfig {
    /// The heartbeat timeout as a duration.
    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::seconds(self.heartbeat_timeout_seconds as i64)
    }

    /// The session timeout as a duration.
    pub fn session_timeout(&self) -> Duration {
        Duration::seconds(self.session_timeout_seconds as i64)
    }
}

/// Minimum token size: 256 bits.
pub const MIN_TOKEN_BYTES: usize = 32;

fn default_heartbeat_timeout() -> u64 {
    300
}

fn default_session_timeout() -> u64 {
    3600
}

fn default_heartbeat_usage() -> u32 {
    5
}

fn default_token_bytes() -> usize {
    MIN_TOKEN_BYTES
}

fn default_true() -> bool {
    true
}
