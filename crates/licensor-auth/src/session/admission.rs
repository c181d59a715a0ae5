//! Pure admission policy.
//!
//! [`classify`] partitions the current session set relative to one login
//! attempt and [`decide`] turns the resulting counts into a verdict. Neither
//! touches storage; the registry applies the outcome with a single write.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use licensor_core::types::{DeviceId, UserId};
use licensor_entity::session::Session;

/// The session set as seen by one login attempt.
#[derive(Debug, Clone)]
pub struct Classification {
    /// Surviving sessions in their original order: live sessions of other
    /// users, live sessions of this user on other devices, and at most one
    /// live session of this user on this device.
    pub kept: Vec<Session>,
    /// Index into `kept` of the live session for this (user, device), if any.
    pub same_device_slot: Option<usize>,
    /// Distinct live devices of this user, excluding the requesting device.
    pub active_devices: usize,
    /// Sessions dropped from the set: dead ones of any user plus duplicate
    /// live sessions for this (user, device).
    pub dropped: usize,
}

impl Classification {
    /// Whether this device already holds a live slot.
    pub fn device_exists(&self) -> bool {
        self.same_device_slot.is_some()
    }
}

/// Admission verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Issue a session.
    Admit,
    /// The user is at the device limit.
    Reject,
}

/// Partition `sessions` for a login by `user_id` from `device`.
pub fn classify(
    sessions: Vec<Session>,
    user_id: UserId,
    device: &DeviceId,
    now: DateTime<Utc>,
    heartbeat_timeout: Duration,
) -> Classification {
    let mut kept = Vec::with_capacity(sessions.len() + 1);
    let mut same_device_slot = None;
    let mut other_devices: HashSet<DeviceId> = HashSet::new();
    let mut dropped = 0;

    for session in sessions {
        if !session.is_live(now, heartbeat_timeout) {
            dropped += 1;
            continue;
        }

        if session.user_id != user_id {
            kept.push(session);
        } else if &session.device_id == device {
            if same_device_slot.is_some() {
                dropped += 1;
                continue;
            }
            same_device_slot = Some(kept.len());
            kept.push(session);
        } else {
            other_devices.insert(session.device_id.clone());
            kept.push(session);
        }
    }

    Classification {
        kept,
        same_device_slot,
        active_devices: other_devices.len(),
        dropped,
    }
}

/// Decide whether a login may take a device slot.
///
/// A device that already holds a live slot is always re-admitted.
pub fn decide(active_devices: usize, device_exists: bool, max_devices: u32) -> Decision {
    if !device_exists && active_devices >= max_devices as usize {
        Decision::Reject
    } else {
        Decision::Admit
    }
}
