//! Globally unique identifiers used throughout OpenEscrow.
//!
//! Both entity IDs use UUIDv7 for time-ordered lexicographic sorting.
//! A nil `PartyId` is the "null identity" rejected at trade creation.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// TradeId
// ---------------------------------------------------------------------------

/// Globally unique trade identifier. Uses UUIDv7 for time-ordered sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TradeId(pub Uuid);

impl TradeId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Extract the embedded timestamp (milliseconds since UNIX epoch) from UUIDv7.
    #[must_use]
    pub fn timestamp_ms(&self) -> u64 {
        let bytes = self.0.as_bytes();
        u64::from_be_bytes([
            0, 0, bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5],
        ])
    }
}

impl Default for TradeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trade:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// PartyId
// ---------------------------------------------------------------------------

/// Unique identity handle for a party bound to a trade (buyer, seller,
/// verifier, arbitrator).
///
/// The nil UUID is the null identity — never a valid participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct PartyId(pub Uuid);

impl PartyId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// The null identity. Rejected wherever a real party is required.
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Whether this is the null identity.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Short prefix for log output.
    #[must_use]
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for PartyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "party:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trade_id_uniqueness() {
        let a = TradeId::new();
        let b = TradeId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn trade_id_ordering() {
        let a = TradeId::new();
        let b = TradeId::new();
        assert!(a < b);
    }

    #[test]
    #[allow(clippy::cast_possible_truncation)]
    fn trade_id_timestamp_extraction() {
        let before = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        let id = TradeId::new();
        let after = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        let ts = id.timestamp_ms();
        assert!(
            ts >= before && ts <= after,
            "ts={ts}, before={before}, after={after}"
        );
    }

    #[test]
    fn party_id_nil_detection() {
        assert!(PartyId::nil().is_nil());
        assert!(!PartyId::new().is_nil());
    }

    #[test]
    fn party_id_short_is_prefix() {
        let id = PartyId::new();
        assert_eq!(id.short().len(), 8);
    }

    #[test]
    fn serde_roundtrips() {
        let tid = TradeId::new();
        let json = serde_json::to_string(&tid).unwrap();
        let back: TradeId = serde_json::from_str(&json).unwrap();
        assert_eq!(tid, back);

        let pid = PartyId::new();
        let json = serde_json::to_string(&pid).unwrap();
        let back: PartyId = serde_json::from_str(&json).unwrap();
        assert_eq!(pid, back);
    }
}
