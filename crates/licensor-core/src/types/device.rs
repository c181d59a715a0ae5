//! Hardware device identifiers.
//!
//! A device identifier is sensitive: it is the credential half of the
//! one-device-per-account binding. [`DeviceId`] therefore never prints its
//! full value through `Display` or `Debug`; both show the first
//! [`VISIBLE_PREFIX`] characters followed by `...`. The full value is only
//! reachable through [`DeviceId::as_str`] and serde (for persistence).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of leading characters kept when an identifier is redacted.
pub const VISIBLE_PREFIX: usize = 16;

/// Truncate an identifier to its visible prefix plus an ellipsis.
///
/// Counts characters, not bytes, so multi-byte input never splits.
pub fn truncate_identifier(value: &str) -> String {
    let prefix: String = value.chars().take(VISIBLE_PREFIX).collect();
    format!("{prefix}...")
}

/// A client-supplied hardware identifier.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Wrap a raw identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The full identifier. Never log this.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// The redacted form safe for logs and list responses.
    pub fn redacted(&self) -> String {
        truncate_identifier(&self.0)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

impl fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceId({})", self.redacted())
    }
}

impl From<&str> for DeviceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DeviceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_display_and_debug_are_redacted() {
        let id = DeviceId::new(LONG);
        assert_eq!(id.to_string(), "0123456789abcdef...");
        assert_eq!(format!("{id:?}"), "DeviceId(0123456789abcdef...)");
        assert!(!format!("{id} {id:?}").contains(LONG));
    }

    #[test]
    fn test_serde_keeps_full_value() {
        let id = DeviceId::new(LONG);
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, format!("\"{LONG}\""));
    }

    #[test]
    fn test_truncate_is_char_safe() {
        let value = "设备设备设备设备设备设备设备设备设备";
        let out = truncate_identifier(value);
        assert_eq!(out.chars().count(), VISIBLE_PREFIX + 3);
    }

    #[test]
    fn test_short_identifier_still_gets_ellipsis() {
        assert_eq!(truncate_identifier("abc"), "abc...");
    }

    #[test]
    fn test_blank() {
        assert!(DeviceId::new("  ").is_blank());
        assert!(!DeviceId::new("d1").is_blank());
    }
}
