//! Trade creation terms and their validation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{EscrowError, EscrowPolicy, Parties, Result, constants};

/// The creation parameters of a trade: parties, price, description.
/// All fields are fixed for the trade's life once accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeTerms {
    pub parties: Parties,
    /// Required deposit amount. Must be strictly positive.
    pub price: Decimal,
    /// Free-form description of the goods or service.
    pub description: String,
}

impl TradeTerms {
    /// Validate the terms against the policy. Rejected terms never produce
    /// a trade.
    ///
    /// # Errors
    /// Returns [`EscrowError::InvalidArgument`] on any nil identity,
    /// `buyer == seller`, a non-positive price, an oversized description,
    /// or (when the policy requires neutrality) an arbitrator that
    /// coincides with buyer or seller.
    pub fn validate(&self, policy: &EscrowPolicy) -> Result<()> {
        let p = &self.parties;
        if p.buyer.is_nil() || p.seller.is_nil() || p.verifier.is_nil() || p.arbitrator.is_nil() {
            return Err(EscrowError::InvalidArgument {
                reason: "all four parties must be non-nil identities".into(),
            });
        }
        if p.buyer == p.seller {
            return Err(EscrowError::InvalidArgument {
                reason: "buyer and seller must be distinct".into(),
            });
        }
        if policy.require_neutral_arbitrator && (p.arbitrator == p.buyer || p.arbitrator == p.seller)
        {
            return Err(EscrowError::InvalidArgument {
                reason: "arbitrator must be neutral: distinct from buyer and seller".into(),
            });
        }
        if self.price <= Decimal::ZERO {
            return Err(EscrowError::InvalidArgument {
                reason: format!("price must be positive, got {}", self.price),
            });
        }
        if self.description.len() > constants::MAX_DESCRIPTION_LEN {
            return Err(EscrowError::InvalidArgument {
                reason: format!(
                    "description exceeds {} bytes",
                    constants::MAX_DESCRIPTION_LEN
                ),
            });
        }
        Ok(())
    }
}

/// Dummy terms for testing.
#[cfg(any(test, feature = "test-helpers"))]
impl TradeTerms {
    /// Distinct parties, unit price, placeholder description.
    #[must_use]
    pub fn dummy(price: Decimal) -> Self {
        Self {
            parties: Parties::dummy(),
            price,
            description: "1 pallet of ceramic tiles, FOB Mombasa".to_string(),
        }
    }
}
