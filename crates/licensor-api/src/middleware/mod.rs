//! HTTP middleware.

pub mod admin;
pub mod cors;
pub mod logging;
