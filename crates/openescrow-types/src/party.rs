//! Role bindings and the authorization check.
//!
//! A trade binds four identity handles to four roles at creation. The
//! verifier may coincide with the seller (a seller self-attesting
//! documents); buyer and seller must always differ. Authorization is an
//! explicit `(operation, caller, bindings, policy) → allow/deny` decision,
//! independent of any execution-environment identity primitive.

use serde::{Deserialize, Serialize};

use crate::{EscrowError, EscrowPolicy, Operation, PartyId, ReleasePolicy, Result};

/// The four roles of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Buyer,
    Seller,
    Verifier,
    Arbitrator,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buyer => write!(f, "BUYER"),
            Self::Seller => write!(f, "SELLER"),
            Self::Verifier => write!(f, "VERIFIER"),
            Self::Arbitrator => write!(f, "ARBITRATOR"),
        }
    }
}

/// The identity bindings of a trade, immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parties {
    pub buyer: PartyId,
    pub seller: PartyId,
    pub verifier: PartyId,
    pub arbitrator: PartyId,
}

impl Parties {
    /// Whether the caller holds the given role. One identity may hold
    /// several roles (verifier == seller is allowed).
    #[must_use]
    pub fn holds(&self, caller: PartyId, role: Role) -> bool {
        match role {
            Role::Buyer => caller == self.buyer,
            Role::Seller => caller == self.seller,
            Role::Verifier => caller == self.verifier,
            Role::Arbitrator => caller == self.arbitrator,
        }
    }

    /// Whether the caller is bound to any of the four roles.
    #[must_use]
    pub fn is_participant(&self, caller: PartyId) -> bool {
        caller == self.buyer
            || caller == self.seller
            || caller == self.verifier
            || caller == self.arbitrator
    }

    /// All roles the caller holds.
    #[must_use]
    pub fn roles_of(&self, caller: PartyId) -> Vec<Role> {
        [Role::Buyer, Role::Seller, Role::Verifier, Role::Arbitrator]
            .into_iter()
            .filter(|role| self.holds(caller, *role))
            .collect()
    }

    /// The authorization decision: may `caller` invoke `operation`?
    ///
    /// # Errors
    /// Returns [`EscrowError::Unauthorized`] when the caller does not hold
    /// a role that the operation admits.
    pub fn authorize(
        &self,
        operation: Operation,
        caller: PartyId,
        policy: &EscrowPolicy,
    ) -> Result<()> {
        let allowed = match operation {
            Operation::Create => true,
            Operation::Fund | Operation::ConfirmDelivery | Operation::CancelBeforeFunding => {
                self.holds(caller, Role::Buyer)
            }
            Operation::SetDocumentHash => self.holds(caller, Role::Verifier),
            Operation::MarkShipped => self.holds(caller, Role::Seller),
            Operation::ReleasePayment => match policy.release_policy {
                ReleasePolicy::AnyCaller => true,
                ReleasePolicy::PartiesOnly => self.is_participant(caller),
            },
            Operation::RaiseDispute => {
                self.holds(caller, Role::Buyer)
                    || self.holds(caller, Role::Seller)
                    || self.holds(caller, Role::Verifier)
            }
            Operation::ResolveDispute => self.holds(caller, Role::Arbitrator),
        };

        if allowed {
            Ok(())
        } else {
            Err(EscrowError::Unauthorized { operation, caller })
        }
    }
}

/// Distinct dummy parties for testing.
#[cfg(any(test, feature = "test-helpers"))]
impl Parties {
    /// Four freshly generated, pairwise distinct identities.
    #[must_use]
    pub fn dummy() -> Self {
        Self {
            buyer: PartyId::new(),
            seller: PartyId::new(),
            verifier: PartyId::new(),
            arbitrator: PartyId::new(),
        }
    }

    /// Seller acting as their own verifier.
    #[must_use]
    pub fn dummy_seller_verifies() -> Self {
        let seller = PartyId::new();
        Self {
            buyer: PartyId::new(),
            seller,
            verifier: seller,
            arbitrator: PartyId::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_maps_roles() {
        let parties = Parties::dummy();
        assert!(parties.holds(parties.buyer, Role::Buyer));
        assert!(parties.holds(parties.arbitrator, Role::Arbitrator));
        assert!(!parties.holds(parties.buyer, Role::Seller));
    }

    #[test]
    fn seller_may_double_as_verifier() {
        let parties = Parties::dummy_seller_verifies();
        assert!(parties.holds(parties.seller, Role::Verifier));
        assert_eq!(
            parties.roles_of(parties.seller),
            vec![Role::Seller, Role::Verifier]
        );
    }

    #[test]
    fn outsider_is_not_participant() {
        let parties = Parties::dummy();
        assert!(parties.is_participant(parties.verifier));
        assert!(!parties.is_participant(PartyId::new()));
    }

    #[test]
    fn fund_is_buyer_only() {
        let parties = Parties::dummy();
        let policy = EscrowPolicy::default();
        assert!(parties.authorize(Operation::Fund, parties.buyer, &policy).is_ok());
        let err = parties
            .authorize(Operation::Fund, parties.seller, &policy)
            .unwrap_err();
        assert!(matches!(err, EscrowError::Unauthorized { .. }));
    }

    #[test]
    fn resolve_is_arbitrator_only() {
        let parties = Parties::dummy();
        let policy = EscrowPolicy::default();
        assert!(parties
            .authorize(Operation::ResolveDispute, parties.arbitrator, &policy)
            .is_ok());
        for caller in [parties.buyer, parties.seller, parties.verifier] {
            assert!(parties
                .authorize(Operation::ResolveDispute, caller, &policy)
                .is_err());
        }
    }

    #[test]
    fn dispute_open_to_buyer_seller_verifier() {
        let parties = Parties::dummy();
        let policy = EscrowPolicy::default();
        for caller in [parties.buyer, parties.seller, parties.verifier] {
            assert!(parties
                .authorize(Operation::RaiseDispute, caller, &policy)
                .is_ok());
        }
        assert!(parties
            .authorize(Operation::RaiseDispute, parties.arbitrator, &policy)
            .is_err());
    }

    #[test]
    fn release_policy_any_caller() {
        let parties = Parties::dummy();
        let policy = EscrowPolicy::default();
        let outsider = PartyId::new();
        assert!(parties
            .authorize(Operation::ReleasePayment, outsider, &policy)
            .is_ok());
    }

    #[test]
    fn release_policy_parties_only() {
        let parties = Parties::dummy();
        let policy = EscrowPolicy {
            release_policy: ReleasePolicy::PartiesOnly,
            ..EscrowPolicy::default()
        };
        assert!(parties
            .authorize(Operation::ReleasePayment, parties.verifier, &policy)
            .is_ok());
        let err = parties
            .authorize(Operation::ReleasePayment, PartyId::new(), &policy)
            .unwrap_err();
        assert!(matches!(err, EscrowError::Unauthorized { .. }));
    }

    #[test]
    fn role_display() {
        assert_eq!(format!("{}", Role::Verifier), "VERIFIER");
        assert_eq!(format!("{}", Role::Arbitrator), "ARBITRATOR");
    }
}
