//! Audit record types for the OpenEscrow trail.
//!
//! Every successful operation appends one immutable [`AuditRecord`] to the
//! trade's trail. Records are append-only, ordered by emission, and are
//! sufficient to reconstruct the full transition sequence deterministically.
//! They are not authoritative state — the trade's `state` field is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{PartyId, TradeId, TradeState};

/// The operation an audit record proves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// The trade was created with its parties and price fixed.
    Create,
    /// The buyer deposited the agreed price into custody.
    Fund,
    /// The verifier attested the document fingerprint.
    SetDocumentHash,
    /// The seller signalled shipment.
    MarkShipped,
    /// The buyer confirmed delivery.
    ConfirmDelivery,
    /// The full held balance was released to the seller.
    ReleasePayment,
    /// A participant escalated the trade to dispute.
    RaiseDispute,
    /// The arbitrator split the held balance.
    ResolveDispute,
    /// The buyer abandoned the trade before funding.
    CancelBeforeFunding,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "CREATE"),
            Self::Fund => write!(f, "FUND"),
            Self::SetDocumentHash => write!(f, "SET_DOCUMENT_HASH"),
            Self::MarkShipped => write!(f, "MARK_SHIPPED"),
            Self::ConfirmDelivery => write!(f, "CONFIRM_DELIVERY"),
            Self::ReleasePayment => write!(f, "RELEASE_PAYMENT"),
            Self::RaiseDispute => write!(f, "RAISE_DISPUTE"),
            Self::ResolveDispute => write!(f, "RESOLVE_DISPUTE"),
            Self::CancelBeforeFunding => write!(f, "CANCEL_BEFORE_FUNDING"),
        }
    }
}

/// An immutable record proving that an operation occurred.
///
/// Each record carries the operation-relevant payload as JSON plus a
/// SHA-256 hash of the canonical payload bytes, so a downstream indexer can
/// verify a record was not altered after emission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// The trade this record belongs to.
    pub trade_id: TradeId,
    /// The operation that succeeded.
    pub operation: Operation,
    /// The identity that invoked the operation.
    pub actor: PartyId,
    /// When the record was emitted.
    pub recorded_at: DateTime<Utc>,
    /// The state the trade was left in.
    pub resulting_state: TradeState,
    /// Operation-relevant payload (amounts, fingerprints, reasons).
    pub payload: serde_json::Value,
    /// SHA-256 hash of the serialized payload.
    pub payload_hash: [u8; 32],
}

impl AuditRecord {
    /// Build a record, stamping the current time and hashing the payload.
    #[must_use]
    pub fn emit(
        trade_id: TradeId,
        operation: Operation,
        actor: PartyId,
        resulting_state: TradeState,
        payload: serde_json::Value,
    ) -> Self {
        let payload_hash = Self::hash_payload(&payload);
        Self {
            trade_id,
            operation,
            actor,
            recorded_at: Utc::now(),
            resulting_state,
            payload,
            payload_hash,
        }
    }

    /// SHA-256 over the compact JSON serialization of the payload.
    #[must_use]
    pub fn hash_payload(payload: &serde_json::Value) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(payload.to_string().as_bytes());
        hasher.finalize().into()
    }

    /// Verify the stored hash still matches the payload.
    #[must_use]
    pub fn verify_payload(&self) -> bool {
        Self::hash_payload(&self.payload) == self.payload_hash
    }
}
