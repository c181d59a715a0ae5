//! Device binding guard.
//!
//! The first successful credential check for an unbound account binds it to
//! the presenting device. From then on only that device may log in until an
//! administrator clears the binding, which also evicts every session of the
//! account so the next login can bind afresh.

use std::sync::Arc;

use tracing::{info, warn};

use licensor_core::clock::Clock;
use licensor_core::error::AppError;
use licensor_core::result::AppResult;
use licensor_core::types::{DeviceId, UserId, truncate_identifier};
use licensor_database::store::UserStore;
use licensor_entity::user::User;

use crate::lock::UserLocks;
use crate::session::SessionRegistry;

/// Outcome of [`DeviceBindingGuard::bind_or_check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingResult {
    /// The device matches the existing binding.
    Allowed,
    /// The account is bound to a different device.
    BoundToOther {
        /// The device the account is bound to.
        bound: DeviceId,
    },
    /// The account was unbound and is now bound to this device.
    BoundNow,
}

/// Outcome of [`DeviceBindingGuard::unbind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnbindOutcome {
    /// The binding that was cleared, if there was one.
    pub previous: Option<DeviceId>,
    /// Sessions evicted as part of the unbind.
    pub evicted: usize,
}

/// Enforces the one-device-per-account binding.
#[derive(Debug, Clone)]
pub struct DeviceBindingGuard {
    users: Arc<dyn UserStore>,
    registry: Arc<SessionRegistry>,
    locks: Arc<UserLocks>,
    clock: Arc<dyn Clock>,
}

impl DeviceBindingGuard {
    /// Creates a guard over the credential store and session registry.
    pub fn new(
        users: Arc<dyn UserStore>,
        registry: Arc<SessionRegistry>,
        locks: Arc<UserLocks>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            registry,
            locks,
            clock,
        }
    }

    /// Check `device` against the binding of `user`, binding it if unset.
    ///
    /// The caller must hold the user lock. `user` is only updated once the
    /// new binding has been persisted.
    pub async fn bind_or_check(&self, user: &mut User, device: &DeviceId) -> AppResult<BindingResult> {
        match &user.bound_device_id {
            Some(bound) if bound == device => Ok(BindingResult::Allowed),
            Some(bound) => {
                warn!(
                    target: "licensor::audit",
                    action = "login_device_mismatch",
                    user_id = %user.id,
                    username = %truncate_identifier(&user.username),
                    bound_device = %bound,
                    device = %device,
                    "Login from a device other than the bound one"
                );
                Ok(BindingResult::BoundToOther {
                    bound: bound.clone(),
                })
            }
            None => {
                let now = self.clock.now();
                let mut bound = user.clone();
                bound.bound_device_id = Some(device.clone());
                bound.device_bound_at = Some(now);
                bound.updated_at = now;

                self.users.update(bound.clone()).await?;
                *user = bound;

                info!(
                    target: "licensor::audit",
                    action = "device_bound",
                    user_id = %user.id,
                    username = %truncate_identifier(&user.username),
                    device = %device,
                    "Bound account to device"
                );
                Ok(BindingResult::BoundNow)
            }
        }
    }

    /// Evict all sessions of `user_id`, then clear its binding.
    ///
    /// Succeeds for an already-unbound account and still evicts. The time of
    /// the cleared binding is kept in `device_bound_at`.
    pub async fn unbind(&self, user_id: UserId) -> AppResult<UnbindOutcome> {
        let _user_guard = self.locks.lock(user_id).await;

        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;

        let evicted = self.registry.evict_all(user_id).await?;

        let previous = user.bound_device_id.take();
        let now = self.clock.now();
        user.device_unbound_at = Some(now);
        user.updated_at = now;
        let username = truncate_identifier(&user.username);
        self.users.update(user).await?;

        let previous_device = previous
            .as_ref()
            .map(DeviceId::redacted)
            .unwrap_or_else(|| "none".to_string());

        info!(
            target: "licensor::audit",
            action = "device_unbound",
            user_id = %user_id,
            username = %username,
            previous_device = %previous_device,
            evicted,
            "Cleared device binding"
        );

        Ok(UnbindOutcome { previous, evicted })
    }
}
