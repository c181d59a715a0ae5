//! Core type definitions used across the Licensor workspace.

pub mod device;
pub mod id;

pub use device::{DeviceId, truncate_identifier};
pub use id::*;
