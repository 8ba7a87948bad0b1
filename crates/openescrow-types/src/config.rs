//! Configuration for an escrow trade.
//!
//! The policy resolves the behaviors the reference design left open, as
//! explicit switches with the reference behavior as the default.

use serde::{Deserialize, Serialize};

/// Who may invoke the final payment release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleasePolicy {
    /// Anyone may release once the preconditions hold — authorization comes
    /// from state, not identity. Reference behavior.
    AnyCaller,
    /// Only the four bound parties may release.
    PartiesOnly,
}

/// Per-trade policy switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowPolicy {
    /// Authorization rule for `release_payment`.
    pub release_policy: ReleasePolicy,
    /// Refuse verifier overwrites of an already-set fingerprint once
    /// shipment has occurred. Off by default (reference behavior allows
    /// the overwrite).
    pub lock_hash_after_shipment: bool,
    /// Require the arbitrator to differ from both buyer and seller at
    /// creation. On by default: optional for correctness, required for
    /// dispute neutrality.
    pub require_neutral_arbitrator: bool,
}

impl Default for EscrowPolicy {
    fn default() -> Self {
        Self {
            release_policy: ReleasePolicy::AnyCaller,
            lock_hash_after_shipment: false,
            require_neutral_arbitrator: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_behavior() {
        let policy = EscrowPolicy::default();
        assert_eq!(policy.release_policy, ReleasePolicy::AnyCaller);
        assert!(!policy.lock_hash_after_shipment);
        assert!(policy.require_neutral_arbitrator);
    }

    #[test]
    fn serde_roundtrip() {
        let policy = EscrowPolicy {
            release_policy: ReleasePolicy::PartiesOnly,
            lock_hash_after_shipment: true,
            require_neutral_arbitrator: false,
        };
        let json = serde_json::to_string(&policy).unwrap();
        let back: EscrowPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(policy, back);
    }
}
