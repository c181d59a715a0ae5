//! Per-user account assignments.

pub mod model;

pub use model::{ACCOUNT_SEPARATOR, AccountAssignment, AccountEntry};
