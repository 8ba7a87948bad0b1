//! Document content fingerprint.
//!
//! The escrow never stores documents — only a fixed-size SHA-256 digest
//! proving which document version the parties agreed upon. The all-zero
//! digest is the "unset" sentinel; payment release is gated on a non-zero
//! fingerprint.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Fixed-size content fingerprint of the trade's agreed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentHash(pub [u8; 32]);

impl DocumentHash {
    /// The unset sentinel (all zeroes).
    pub const ZERO: Self = Self([0u8; 32]);

    /// Fingerprint arbitrary document bytes.
    #[must_use]
    pub fn digest(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);
        Self(hasher.finalize().into())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Whether this is the unset sentinel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Short hex prefix for log output.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl Default for DocumentHash {
    fn default() -> Self {
        Self::ZERO
    }
}

impl std::fmt::Display for DocumentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", hex::encode(self.0))
    }
}
