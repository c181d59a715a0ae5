//! License entity.

pub mod model;

pub use model::{License, LicenseStatus};
