//! # licensor-core
//!
//! Core crate for the Licensor session authority. Contains configuration
//! schemas, typed identifiers, the redacting [`types::DeviceId`], the
//! [`clock::Clock`] time source, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Licensor crates.

pub mod clock;
pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use clock::{Clock, SystemClock};
pub use error::{AppError, ErrorKind};
pub use result::AppResult;
