//! License administration.

pub mod service;

pub use service::{LicenseAdminService, LicenseSummary, UpdateLicenseRequest};
