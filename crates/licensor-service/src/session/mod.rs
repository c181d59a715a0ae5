//! Session administration.

pub mod admin;

pub use admin::{SessionAdminService, SessionSummary};
