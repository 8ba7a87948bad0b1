//! The per-trade escrow state machine.
//!
//! Each [`TradeEscrow`] holds custody of one fixed deposit and exposes
//! role-scoped transition operations. Operations are idempotent-rejecting:
//! called from a state where the precondition does not hold, they fail
//! deterministically instead of silently no-opping, so callers can
//! distinguish "already done" from "succeeded".
//!
//! Guard order on every operation: reentrancy lock → actor → state →
//! arguments. All validation happens before any mutation.
//!
//! ## Payout sequencing
//!
//! The terminal state is committed and the reentrancy lock taken **before**
//! any external transfer is issued, so a callback surface on the channel
//! cannot re-enter an apparently releasable trade. A cleanly failed
//! transfer restores state and balance exactly and the operation is fully
//! retryable. Dispute resolution issues two legs; if the refund leg fails
//! after the seller leg settled, `held` reflects only the unpaid portion
//! and the distinct `PartialPayout` condition is surfaced.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;

use openescrow_types::{
    AuditRecord, DocumentHash, EscrowError, EscrowPolicy, Operation, Parties, PartyId, Result,
    SettlementChannel, TradeId, TradeState, TradeTerms, constants,
};

/// A single-trade escrow agreement holding custody of a fixed deposit.
#[derive(Debug)]
pub struct TradeEscrow {
    id: TradeId,
    parties: Parties,
    price: Decimal,
    description: String,
    policy: EscrowPolicy,
    state: TradeState,
    document_hash: DocumentHash,
    funded_at: Option<DateTime<Utc>>,
    shipped_at: Option<DateTime<Utc>>,
    held: Decimal,
    dispute_reason: Option<String>,
    /// Cumulative seller share paid across (possibly retried) dispute
    /// resolutions. Selects the terminal state after a partial payout.
    dispute_seller_paid: Decimal,
    /// Transient guard held for the full duration of all transfers in an
    /// operation.
    transfer_lock: bool,
    /// Append-only, ordered by emission.
    audit: Vec<AuditRecord>,
}

impl TradeEscrow {
    /// Create a trade with its parties, price, and description fixed.
    ///
    /// # Errors
    /// Returns `InvalidArgument` on nil identities, `buyer == seller`,
    /// a non-positive price, or a policy violation (see
    /// [`TradeTerms::validate`]).
    pub fn new(terms: TradeTerms, policy: EscrowPolicy) -> Result<Self> {
        terms.validate(&policy)?;

        let mut escrow = Self {
            id: TradeId::new(),
            parties: terms.parties,
            price: terms.price,
            description: terms.description,
            policy,
            state: TradeState::Created,
            document_hash: DocumentHash::ZERO,
            funded_at: None,
            shipped_at: None,
            held: Decimal::ZERO,
            dispute_reason: None,
            dispute_seller_paid: Decimal::ZERO,
            transfer_lock: false,
            audit: Vec::new(),
        };

        tracing::info!(
            trade = %escrow.id,
            buyer = %escrow.parties.buyer,
            seller = %escrow.parties.seller,
            price = %escrow.price,
            "Trade escrow created"
        );
        // The creation call carries no actor; attributed to the buyer, the
        // party that must act next.
        escrow.record(
            Operation::Create,
            escrow.parties.buyer,
            json!({
                "price": escrow.price.to_string(),
                "description": escrow.description.clone(),
            }),
        );
        Ok(escrow)
    }

    // =====================================================================
    // Transition operations
    // =====================================================================

    /// Buyer deposits the agreed price. `Created` → `Funded`.
    ///
    /// # Errors
    /// `Unauthorized` for non-buyers, `InvalidState` outside `Created`,
    /// `AmountMismatch` unless `amount == price`.
    pub fn fund(&mut self, caller: PartyId, amount: Decimal) -> Result<()> {
        self.ensure_unlocked()?;
        self.parties.authorize(Operation::Fund, caller, &self.policy)?;
        self.ensure_state(Operation::Fund, &[TradeState::Created])?;
        if amount != self.price {
            return Err(EscrowError::AmountMismatch {
                expected: self.price,
                actual: amount,
            });
        }

        self.funded_at = Some(Utc::now());
        self.held = amount;
        self.state = TradeState::Funded;

        tracing::info!(trade = %self.id, amount = %amount, "Escrow funded");
        self.record(Operation::Fund, caller, json!({ "amount": amount.to_string() }));
        Ok(())
    }

    /// Verifier attests the document fingerprint. In `Funded`, advances to
    /// `DocumentsVerified`; in `Shipped`, records the hash without a state
    /// change (an overwrite the policy may refuse once shipment occurred).
    ///
    /// # Errors
    /// `Unauthorized` for non-verifiers, `InvalidState` outside
    /// `Funded`/`Shipped` or when the post-shipment overwrite is locked,
    /// `InvalidArgument` for the zero fingerprint.
    pub fn set_document_hash(&mut self, caller: PartyId, hash: DocumentHash) -> Result<()> {
        self.ensure_unlocked()?;
        self.parties
            .authorize(Operation::SetDocumentHash, caller, &self.policy)?;
        self.ensure_state(
            Operation::SetDocumentHash,
            &[TradeState::Funded, TradeState::Shipped],
        )?;
        if hash.is_empty() {
            return Err(EscrowError::InvalidArgument {
                reason: "document fingerprint must be non-zero".into(),
            });
        }
        if self.state == TradeState::Shipped
            && self.policy.lock_hash_after_shipment
            && !self.document_hash.is_empty()
        {
            return Err(EscrowError::InvalidState {
                operation: Operation::SetDocumentHash,
                state: self.state,
            });
        }

        self.document_hash = hash;
        if self.state == TradeState::Funded {
            self.state = TradeState::DocumentsVerified;
        }

        tracing::info!(
            trade = %self.id,
            hash = %hash.short(),
            state = %self.state,
            "Document fingerprint attested"
        );
        self.record(
            Operation::SetDocumentHash,
            caller,
            json!({ "document_hash": hash.to_string() }),
        );
        Ok(())
    }

    /// Seller signals shipment. `Funded` or `DocumentsVerified` → `Shipped`.
    ///
    /// # Errors
    /// `Unauthorized` for non-sellers, `InvalidState` elsewhere.
    pub fn mark_shipped(&mut self, caller: PartyId) -> Result<()> {
        self.ensure_unlocked()?;
        self.parties
            .authorize(Operation::MarkShipped, caller, &self.policy)?;
        self.ensure_state(
            Operation::MarkShipped,
            &[TradeState::Funded, TradeState::DocumentsVerified],
        )?;

        self.shipped_at = Some(Utc::now());
        self.state = TradeState::Shipped;

        tracing::info!(trade = %self.id, "Shipment signalled");
        self.record(Operation::MarkShipped, caller, json!({}));
        Ok(())
    }

    /// Buyer confirms delivery. Requires a prior shipment signal.
    /// `Shipped`/`DocumentsVerified` → `Delivered`.
    ///
    /// # Errors
    /// `Unauthorized` for non-buyers; `InvalidState` outside the allowed
    /// states or when no shipment signal has been recorded.
    pub fn confirm_delivery(&mut self, caller: PartyId) -> Result<()> {
        self.ensure_unlocked()?;
        self.parties
            .authorize(Operation::ConfirmDelivery, caller, &self.policy)?;
        self.ensure_state(
            Operation::ConfirmDelivery,
            &[TradeState::Shipped, TradeState::DocumentsVerified],
        )?;
        if self.shipped_at.is_none() {
            // Delivery before any shipment signal must fail.
            return Err(EscrowError::InvalidState {
                operation: Operation::ConfirmDelivery,
                state: self.state,
            });
        }

        self.state = TradeState::Delivered;

        tracing::info!(trade = %self.id, "Delivery confirmed");
        self.record(Operation::ConfirmDelivery, caller, json!({}));
        Ok(())
    }

    /// Release the full held balance to the seller. `Delivered` →
    /// `Completed`. Authorization follows the trade's release policy.
    ///
    /// On a clean channel failure nothing is applied: state and balance are
    /// restored exactly and the call is fully retryable. After a channel
    /// crash with unknown outcome, check [`held_balance`] — zero means the
    /// payout already applied.
    ///
    /// # Errors
    /// `InvalidState` outside `Delivered`, `DocumentsUnset` without a
    /// verified fingerprint, `TransferFailure` from the channel.
    ///
    /// [`held_balance`]: Self::held_balance
    pub fn release_payment(
        &mut self,
        caller: PartyId,
        channel: &mut dyn SettlementChannel,
    ) -> Result<()> {
        self.ensure_unlocked()?;
        self.parties
            .authorize(Operation::ReleasePayment, caller, &self.policy)?;
        self.ensure_state(Operation::ReleasePayment, &[TradeState::Delivered])?;
        if self.document_hash.is_empty() {
            return Err(EscrowError::DocumentsUnset);
        }

        // Terminal state committed before the external call; the lock
        // covers the transfer itself.
        let amount = self.held;
        self.transfer_lock = true;
        self.state = TradeState::Completed;
        self.held = Decimal::ZERO;

        if let Err(err) = channel.transfer(self.parties.seller, amount) {
            self.state = TradeState::Delivered;
            self.held = amount;
            self.transfer_lock = false;
            tracing::warn!(
                trade = %self.id,
                amount = %amount,
                %err,
                "Payment release failed; escrow restored"
            );
            return Err(err);
        }
        self.transfer_lock = false;

        tracing::info!(
            trade = %self.id,
            seller = %self.parties.seller,
            amount = %amount,
            "Payment released"
        );
        self.record(
            Operation::ReleasePayment,
            caller,
            json!({ "seller_amount": amount.to_string() }),
        );
        Ok(())
    }

    /// Buyer, seller, or verifier escalates the trade. Any fund-holding,
    /// non-disputed state → `Disputed`.
    ///
    /// # Errors
    /// `Unauthorized` for the arbitrator or outsiders, `InvalidState`
    /// outside `Funded`/`DocumentsVerified`/`Shipped`/`Delivered`.
    pub fn raise_dispute(&mut self, caller: PartyId, reason: &str) -> Result<()> {
        self.ensure_unlocked()?;
        self.parties
            .authorize(Operation::RaiseDispute, caller, &self.policy)?;
        self.ensure_state(
            Operation::RaiseDispute,
            &[
                TradeState::Funded,
                TradeState::DocumentsVerified,
                TradeState::Shipped,
                TradeState::Delivered,
            ],
        )?;
        Self::ensure_note(reason, "dispute reason")?;

        self.dispute_reason = Some(reason.to_string());
        self.state = TradeState::Disputed;

        tracing::info!(trade = %self.id, by = %caller, reason, "Dispute raised");
        self.record(Operation::RaiseDispute, caller, json!({ "reason": reason }));
        Ok(())
    }

    /// Arbitrator splits the held balance: `seller_amount` to the seller,
    /// the remainder refunded to the buyer. `Disputed` → `Completed` if any
    /// seller share was ever paid, else `Cancelled`.
    ///
    /// Two transfer legs. A seller-leg failure restores everything (fully
    /// retryable). A refund-leg failure after the seller leg settled leaves
    /// state at `Disputed` with `held` equal to the unpaid refund and
    /// surfaces `PartialPayout`; resolving again for the remainder
    /// completes the payout.
    ///
    /// # Errors
    /// `Unauthorized` for non-arbitrators, `InvalidState` outside
    /// `Disputed`, `SplitExceedsBalance` when `seller_amount > held`,
    /// `TransferFailure` / `PartialPayout` from the channel legs.
    pub fn resolve_dispute(
        &mut self,
        caller: PartyId,
        seller_amount: Decimal,
        note: &str,
        channel: &mut dyn SettlementChannel,
    ) -> Result<()> {
        self.ensure_unlocked()?;
        self.parties
            .authorize(Operation::ResolveDispute, caller, &self.policy)?;
        self.ensure_state(Operation::ResolveDispute, &[TradeState::Disputed])?;
        Self::ensure_note(note, "resolution note")?;
        if seller_amount.is_sign_negative() {
            return Err(EscrowError::InvalidArgument {
                reason: format!("seller amount must be non-negative, got {seller_amount}"),
            });
        }
        if seller_amount > self.held {
            return Err(EscrowError::SplitExceedsBalance {
                requested: seller_amount,
                held: self.held,
            });
        }

        let buyer_refund = self.held - seller_amount;
        let terminal = if self.dispute_seller_paid + seller_amount > Decimal::ZERO {
            TradeState::Completed
        } else {
            TradeState::Cancelled
        };

        // Terminal state first; the lock is held across both legs.
        self.transfer_lock = true;
        self.state = terminal;

        if seller_amount > Decimal::ZERO {
            if let Err(err) = channel.transfer(self.parties.seller, seller_amount) {
                // Nothing moved: restore exactly, split stays retryable.
                self.state = TradeState::Disputed;
                self.transfer_lock = false;
                tracing::warn!(
                    trade = %self.id,
                    %err,
                    "Dispute payout failed on seller leg; escrow restored"
                );
                return Err(err);
            }
            self.held -= seller_amount;
            self.dispute_seller_paid += seller_amount;
        }

        if buyer_refund > Decimal::ZERO {
            if let Err(err) = channel.transfer(self.parties.buyer, buyer_refund) {
                self.state = TradeState::Disputed;
                self.transfer_lock = false;
                tracing::warn!(
                    trade = %self.id,
                    seller_paid = %seller_amount,
                    refund_pending = %buyer_refund,
                    %err,
                    "Dispute payout failed on refund leg"
                );
                return Err(EscrowError::PartialPayout {
                    seller_paid: seller_amount,
                    refund_pending: buyer_refund,
                });
            }
            self.held -= buyer_refund;
        }

        self.transfer_lock = false;

        tracing::info!(
            trade = %self.id,
            seller_amount = %seller_amount,
            buyer_refund = %buyer_refund,
            state = %self.state,
            "Dispute resolved"
        );
        self.record(
            Operation::ResolveDispute,
            caller,
            json!({
                "seller_amount": seller_amount.to_string(),
                "buyer_refund": buyer_refund.to_string(),
                "seller_paid_total": self.dispute_seller_paid.to_string(),
                "note": note,
            }),
        );
        Ok(())
    }

    /// Buyer abandons the trade before funding. `Created` → `Cancelled`,
    /// no funds moved.
    ///
    /// # Errors
    /// `Unauthorized` for non-buyers, `InvalidState` outside `Created`.
    pub fn cancel_before_funding(&mut self, caller: PartyId, reason: &str) -> Result<()> {
        self.ensure_unlocked()?;
        self.parties
            .authorize(Operation::CancelBeforeFunding, caller, &self.policy)?;
        self.ensure_state(Operation::CancelBeforeFunding, &[TradeState::Created])?;
        Self::ensure_note(reason, "cancellation reason")?;

        self.state = TradeState::Cancelled;

        tracing::info!(trade = %self.id, reason, "Trade cancelled before funding");
        self.record(
            Operation::CancelBeforeFunding,
            caller,
            json!({ "reason": reason }),
        );
        Ok(())
    }

    // =====================================================================
    // Query surface (read-only, side-effect-free)
    // =====================================================================

    #[must_use]
    pub fn id(&self) -> TradeId {
        self.id
    }

    #[must_use]
    pub fn state(&self) -> TradeState {
        self.state
    }

    #[must_use]
    pub fn parties(&self) -> Parties {
        self.parties
    }

    #[must_use]
    pub fn price(&self) -> Decimal {
        self.price
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn policy(&self) -> EscrowPolicy {
        self.policy
    }

    /// Funds currently in custody. Equals `price` from `Funded` through
    /// `Delivered`/`Disputed` (before any dispute payout), 0 after a
    /// terminal payout.
    #[must_use]
    pub fn held_balance(&self) -> Decimal {
        self.held
    }

    #[must_use]
    pub fn document_hash(&self) -> DocumentHash {
        self.document_hash
    }

    #[must_use]
    pub fn funded_at(&self) -> Option<DateTime<Utc>> {
        self.funded_at
    }

    #[must_use]
    pub fn shipped_at(&self) -> Option<DateTime<Utc>> {
        self.shipped_at
    }

    #[must_use]
    pub fn dispute_reason(&self) -> Option<&str> {
        self.dispute_reason.as_deref()
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// The trade's append-only audit trail, ordered by emission.
    #[must_use]
    pub fn audit_trail(&self) -> &[AuditRecord] {
        &self.audit
    }

    // =====================================================================
    // Guards
    // =====================================================================

    fn ensure_unlocked(&self) -> Result<()> {
        if self.transfer_lock {
            return Err(EscrowError::TransferInProgress);
        }
        Ok(())
    }

    fn ensure_state(&self, operation: Operation, allowed: &[TradeState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(EscrowError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    fn ensure_note(text: &str, what: &str) -> Result<()> {
        if text.len() > constants::MAX_NOTE_LEN {
            return Err(EscrowError::InvalidArgument {
                reason: format!("{what} exceeds {} bytes", constants::MAX_NOTE_LEN),
            });
        }
        Ok(())
    }

    fn record(&mut self, operation: Operation, actor: PartyId, payload: serde_json::Value) {
        self.audit
            .push(AuditRecord::emit(self.id, operation, actor, self.state, payload));
    }
}
