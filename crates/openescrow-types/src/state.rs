//! # TradeState — the escrow lifecycle
//!
//! ```text
//!                        ┌────────────────────┐
//!                        ▼                    │
//!   CREATED ──▶ FUNDED ──▶ DOCUMENTS_VERIFIED │
//!      │          │              │            │
//!      │          └──────────────┼──▶ SHIPPED ◀┘
//!      │                         │       │
//!      │                         ▼       ▼
//!      │                       DELIVERED ──▶ COMPLETED
//!      │                                       ▲
//!      │   FUNDED/DOCS/SHIPPED/DELIVERED ──▶ DISPUTED
//!      │                                       │
//!      ▼                                       ▼
//!   CANCELLED ◀────────────────────────────────┘
//! ```
//!
//! `SHIPPED` and `DOCUMENTS_VERIFIED` are not strictly ordered — either may
//! precede the other. `COMPLETED` and `CANCELLED` are terminal: no outgoing
//! transitions, and every operation attempted from them fails with an
//! invalid-state error.

use serde::{Deserialize, Serialize};

/// The lifecycle state of a trade escrow.
///
/// Transitions are **monotonic toward a terminal state** — there is no way
/// back out of `Completed` or `Cancelled`, and the only backward-looking
/// move at all is the dispute branch collapsing into one of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeState {
    /// Trade agreed; waiting for the buyer's deposit.
    Created,
    /// Deposit in custody. Verification and shipment may now proceed.
    Funded,
    /// The verifier has attested the document fingerprint.
    DocumentsVerified,
    /// The seller has signalled shipment.
    Shipped,
    /// The buyer has confirmed delivery. Payment may be released.
    Delivered,
    /// A participant escalated; only the arbitrator can move the trade on.
    Disputed,
    /// Funds paid out to the seller (fully, or partially via arbitration).
    /// **Terminal.**
    Completed,
    /// Trade abandoned pre-funding, or arbitrated to a full buyer refund.
    /// **Terminal.**
    Cancelled,
}

impl TradeState {
    /// Can this state transition to the given target state?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Created, Self::Funded | Self::Cancelled)
                | (
                    Self::Funded,
                    Self::DocumentsVerified | Self::Shipped | Self::Disputed
                )
                | (
                    Self::DocumentsVerified,
                    Self::Shipped | Self::Delivered | Self::Disputed
                )
                | (Self::Shipped, Self::Delivered | Self::Disputed)
                | (Self::Delivered, Self::Completed | Self::Disputed)
                | (Self::Disputed, Self::Completed | Self::Cancelled)
        )
    }

    /// Whether this state admits no further transitions.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether the deposit is in custody in this state (before any dispute
    /// payout). `held == price` exactly in these states, 0 everywhere else.
    #[must_use]
    pub fn holds_funds(&self) -> bool {
        matches!(
            self,
            Self::Funded
                | Self::DocumentsVerified
                | Self::Shipped
                | Self::Delivered
                | Self::Disputed
        )
    }

    /// Human-readable label for display surfaces.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Funded => "Funded",
            Self::DocumentsVerified => "Documents Verified",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Disputed => "Disputed",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for TradeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "CREATED"),
            Self::Funded => write!(f, "FUNDED"),
            Self::DocumentsVerified => write!(f, "DOCUMENTS_VERIFIED"),
            Self::Shipped => write!(f, "SHIPPED"),
            Self::Delivered => write!(f, "DELIVERED"),
            Self::Disputed => write!(f, "DISPUTED"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [TradeState; 8] = [
        TradeState::Created,
        TradeState::Funded,
        TradeState::DocumentsVerified,
        TradeState::Shipped,
        TradeState::Delivered,
        TradeState::Disputed,
        TradeState::Completed,
        TradeState::Cancelled,
    ];

    #[test]
    fn happy_path_transitions_valid() {
        assert!(TradeState::Created.can_transition_to(TradeState::Funded));
        assert!(TradeState::Funded.can_transition_to(TradeState::DocumentsVerified));
        assert!(TradeState::DocumentsVerified.can_transition_to(TradeState::Shipped));
        assert!(TradeState::Shipped.can_transition_to(TradeState::Delivered));
        assert!(TradeState::Delivered.can_transition_to(TradeState::Completed));
    }

    #[test]
    fn shipment_and_verification_unordered() {
        // Shipment may precede verification and vice versa.
        assert!(TradeState::Funded.can_transition_to(TradeState::Shipped));
        assert!(TradeState::Funded.can_transition_to(TradeState::DocumentsVerified));
        assert!(TradeState::DocumentsVerified.can_transition_to(TradeState::Shipped));
    }

    #[test]
    fn dispute_reachable_from_funded_states() {
        for state in [
            TradeState::Funded,
            TradeState::DocumentsVerified,
            TradeState::Shipped,
            TradeState::Delivered,
        ] {
            assert!(
                state.can_transition_to(TradeState::Disputed),
                "{state} must reach DISPUTED"
            );
        }
        assert!(!TradeState::Created.can_transition_to(TradeState::Disputed));
    }

    #[test]
    fn cancellation_edges() {
        assert!(TradeState::Created.can_transition_to(TradeState::Cancelled));
        assert!(TradeState::Disputed.can_transition_to(TradeState::Cancelled));
        assert!(!TradeState::Funded.can_transition_to(TradeState::Cancelled));
        assert!(!TradeState::Delivered.can_transition_to(TradeState::Cancelled));
    }

    #[test]
    fn dispute_resolution_edges() {
        assert!(TradeState::Disputed.can_transition_to(TradeState::Completed));
        assert!(TradeState::Disputed.can_transition_to(TradeState::Cancelled));
        assert!(!TradeState::Disputed.can_transition_to(TradeState::Funded));
    }

    #[test]
    fn terminal_states_have_no_exits() {
        for terminal in [TradeState::Completed, TradeState::Cancelled] {
            assert!(terminal.is_terminal());
            for target in ALL {
                assert!(
                    !terminal.can_transition_to(target),
                    "{terminal} must not reach {target}"
                );
            }
        }
    }

    #[test]
    fn no_backward_transitions() {
        assert!(!TradeState::Funded.can_transition_to(TradeState::Created));
        assert!(!TradeState::Shipped.can_transition_to(TradeState::Funded));
        assert!(!TradeState::Delivered.can_transition_to(TradeState::Shipped));
    }

    #[test]
    fn custody_window() {
        for state in ALL {
            let expected = !matches!(
                state,
                TradeState::Created | TradeState::Completed | TradeState::Cancelled
            );
            assert_eq!(state.holds_funds(), expected, "custody window for {state}");
        }
    }

    #[test]
    fn display_tags_stable() {
        assert_eq!(format!("{}", TradeState::DocumentsVerified), "DOCUMENTS_VERIFIED");
        assert_eq!(format!("{}", TradeState::Cancelled), "CANCELLED");
        assert_eq!(TradeState::DocumentsVerified.label(), "Documents Verified");
    }

    #[test]
    fn serde_roundtrip() {
        for state in ALL {
            let json = serde_json::to_string(&state).unwrap();
            let back: TradeState = serde_json::from_str(&json).unwrap();
            assert_eq!(state, back);
        }
    }
}
