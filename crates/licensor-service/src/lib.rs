//! # licensor-service
//!
//! Administrative operations layered over the session authority. Every
//! service here sits behind the admin key and consumes the registry through
//! `kick`, `list_live` and `evict_all`. Account lists are the exception: a
//! licensed client reads its own.

pub mod account;
pub mod license;
pub mod session;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support;

pub use account::{AccountAdminService, AccountsUpdated};
pub use license::{LicenseAdminService, LicenseSummary, UpdateLicenseRequest};
pub use session::{SessionAdminService, SessionSummary};
pub use user::{AdminUserService, CreateUserRequest, CreatedUser, UserSummary};
