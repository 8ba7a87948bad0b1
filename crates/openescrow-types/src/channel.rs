//! The Settlement Channel boundary contract.
//!
//! The escrow never moves value itself — it consumes an external transfer
//! capability. Each call is atomic: either the full amount moves or none
//! does. The channel is idempotent from the caller's perspective only if
//! the caller tracks its own completion; the escrow does so by zeroing its
//! held balance exactly when a transfer succeeds, so a retry after an
//! unknown outcome can check `held_balance() == 0` before reattempting.

use rust_decimal::Decimal;

use crate::{PartyId, Result};

/// External capability that moves value to a recipient atomically.
///
/// Implementations must guarantee: on `Ok(())` the full amount moved; on
/// `Err(TransferFailure)` no value moved. A crashed call with unknown
/// outcome is the caller's retry problem (see crate docs on idempotent
/// retry).
pub trait SettlementChannel {
    /// Transfer `amount` to `recipient`.
    ///
    /// # Errors
    /// Returns [`crate::EscrowError::TransferFailure`] if the channel
    /// declined or errored. No partial transfer is possible.
    fn transfer(&mut self, recipient: PartyId, amount: Decimal) -> Result<()>;
}
