//! Per-user account assignment.

pub mod service;

pub use service::{AccountAdminService, AccountsUpdated};
