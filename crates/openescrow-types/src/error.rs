//! Error types for the OpenEscrow engine.
//!
//! All errors use the `ES_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Argument / validation errors
//! - 2xx: Authorization errors
//! - 3xx: State machine errors
//! - 4xx: Settlement errors
//!
//! Every validation error is detected and rejected **before** any state
//! mutation or fund movement. The one exception is [`EscrowError::PartialPayout`],
//! which reports a dispute resolution that paid the seller leg but could not
//! complete the buyer refund — a distinct, retryable condition, never merged
//! into plain success or failure.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{Operation, PartyId, TradeState};

/// Central error enum for all OpenEscrow operations.
#[derive(Debug, Error)]
pub enum EscrowError {
    // =================================================================
    // Argument Errors (1xx)
    // =================================================================
    /// A creation parameter or operation argument failed validation.
    #[error("ES_ERR_100: Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// The funding amount does not equal the agreed price.
    #[error("ES_ERR_101: Funding amount mismatch: expected {expected}, got {actual}")]
    AmountMismatch { expected: Decimal, actual: Decimal },

    /// A dispute split requested more than the held balance.
    #[error("ES_ERR_102: Split exceeds held balance: requested {requested}, held {held}")]
    SplitExceedsBalance { requested: Decimal, held: Decimal },

    /// Payment release requires a verified document fingerprint.
    #[error("ES_ERR_103: Document fingerprint not set")]
    DocumentsUnset,

    // =================================================================
    // Authorization Errors (2xx)
    // =================================================================
    /// The caller does not hold the role required for the operation.
    #[error("ES_ERR_200: Unauthorized: {caller} may not invoke {operation}")]
    Unauthorized {
        operation: Operation,
        caller: PartyId,
    },

    // =================================================================
    // State Machine Errors (3xx)
    // =================================================================
    /// The operation's precondition on `state` does not hold.
    #[error("ES_ERR_300: Invalid state for {operation}: trade is {state}")]
    InvalidState {
        operation: Operation,
        state: TradeState,
    },

    /// A transfer-issuing operation re-entered while a transfer was in
    /// flight on the same trade instance.
    #[error("ES_ERR_301: Transfer already in progress on this trade")]
    TransferInProgress,

    // =================================================================
    // Settlement Errors (4xx)
    // =================================================================
    /// The Settlement Channel declined or errored. No value moved; the
    /// operation is fully retryable.
    #[error("ES_ERR_400: Transfer failed: {reason}")]
    TransferFailure { reason: String },

    /// Dispute resolution paid the seller leg but the buyer refund failed.
    /// The held balance reflects only the unpaid portion; resolve again for
    /// the remainder.
    #[error(
        "ES_ERR_401: Partial payout: seller received {seller_paid}, refund of {refund_pending} still pending"
    )]
    PartialPayout {
        seller_paid: Decimal,
        refund_pending: Decimal,
    },
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, EscrowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = EscrowError::DocumentsUnset;
        let msg = format!("{err}");
        assert!(msg.starts_with("ES_ERR_103"), "Got: {msg}");
    }

    #[test]
    fn amount_mismatch_display() {
        let err = EscrowError::AmountMismatch {
            expected: Decimal::new(100, 0),
            actual: Decimal::new(50, 0),
        };
        let msg = format!("{err}");
        assert!(msg.contains("ES_ERR_101"));
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn invalid_state_display() {
        let err = EscrowError::InvalidState {
            operation: Operation::ConfirmDelivery,
            state: TradeState::Funded,
        };
        let msg = format!("{err}");
        assert!(msg.contains("ES_ERR_300"));
        assert!(msg.contains("CONFIRM_DELIVERY"));
        assert!(msg.contains("FUNDED"));
    }

    #[test]
    fn all_errors_have_es_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(EscrowError::InvalidArgument {
                reason: "test".into(),
            }),
            Box::new(EscrowError::SplitExceedsBalance {
                requested: Decimal::ONE,
                held: Decimal::ZERO,
            }),
            Box::new(EscrowError::Unauthorized {
                operation: Operation::Fund,
                caller: PartyId::new(),
            }),
            Box::new(EscrowError::TransferInProgress),
            Box::new(EscrowError::TransferFailure {
                reason: "declined".into(),
            }),
            Box::new(EscrowError::PartialPayout {
                seller_paid: Decimal::ONE,
                refund_pending: Decimal::ONE,
            }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("ES_ERR_"),
                "Error missing ES_ERR_ prefix: {msg}"
            );
        }
    }
}
