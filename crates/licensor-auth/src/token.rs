//! Random credential generation.

use rand::RngCore;
use rand::rngs::OsRng;

use licensor_core::config::MIN_TOKEN_BYTES;
use licensor_entity::session::SessionToken;

/// Bytes of entropy in a license key (32 hex characters).
const LICENSE_KEY_BYTES: usize = 16;

/// Generates hex-encoded random credentials from the OS RNG.
#[derive(Debug, Clone, Copy)]
pub struct TokenGenerator {
    bytes: usize,
}

impl TokenGenerator {
    /// A generator producing `bytes` of entropy per token, never fewer than
    /// [`MIN_TOKEN_BYTES`].
    pub fn new(bytes: usize) -> Self {
        Self {
            bytes: bytes.max(MIN_TOKEN_BYTES),
        }
    }

    /// Entropy per token in bytes.
    pub fn bytes(&self) -> usize {
        self.bytes
    }

    /// A fresh session token.
    pub fn session_token(&self) -> SessionToken {
        SessionToken::new(random_hex(self.bytes))
    }

    /// A fresh license key.
    pub fn license_key(&self) -> String {
        random_hex(LICENSE_KEY_BYTES)
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new(MIN_TOKEN_BYTES)
    }
}

fn random_hex(len: usize) -> String {
    let mut buf = vec![0u8; len];
    OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}
