//! Liveness sweep.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use licensor_entity::session::Session;

/// Outcome of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Sessions removed.
    pub removed: usize,
    /// Sessions left.
    pub remaining: usize,
}

/// Drop every session whose heartbeat is at least `heartbeat_timeout` old.
///
/// Returns the survivors in their original order and a report.
pub fn sweep_dead(
    sessions: Vec<Session>,
    now: DateTime<Utc>,
    heartbeat_timeout: Duration,
) -> (Vec<Session>, SweepReport) {
    let before = sessions.len();
    let live: Vec<Session> = sessions
        .into_iter()
        .filter(|s| s.is_live(now, heartbeat_timeout))
        .collect();

    let report = SweepReport {
        removed: before - live.len(),
        remaining: live.len(),
    };
    (live, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use licensor_core::types::{DeviceId, UserId};
    use licensor_entity::session::SessionToken;

    #[test]
    fn test_boundary_session_is_swept() {
        let now = Utc::now();
        let timeout = Duration::minutes(5);
        let fresh = Session::issue(
            SessionToken::new("a"),
            UserId::new(),
            "a",
            DeviceId::new("D1"),
            now - Duration::seconds(299),
        );
        let boundary = Session::issue(
            SessionToken::new("b"),
            UserId::new(),
            "b",
            DeviceId::new("D2"),
            now - timeout,
        );

        let (live, report) = sweep_dead(vec![fresh, boundary], now, timeout);
        assert_eq!(report, SweepReport { removed: 1, remaining: 1 });
        assert_eq!(live[0].token.as_str(), "a");
    }
}
