//! One-device-per-account enforcement.

pub mod guard;

pub use guard::{BindingResult, DeviceBindingGuard, UnbindOutcome};
