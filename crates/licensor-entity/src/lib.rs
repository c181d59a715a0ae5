//! # licensor-entity
//!
//! Domain entity models persisted by the stores and passed between the
//! authority crates.

pub mod account;
pub mod license;
pub mod session;
pub mod user;
