//! Local atomic settlement ledger.
//!
//! Credits recipients in memory. Each `transfer` call is atomic: the full
//! amount is credited or the call fails with no value moved. The ledger
//! also tracks the conservation total — the sum of all per-recipient
//! credits always equals the sum of amounts accepted through `transfer`.

use std::collections::HashMap;

use openescrow_types::{EscrowError, PartyId, Result, SettlementChannel};
use rust_decimal::Decimal;

/// In-memory settlement backend crediting recipients directly.
#[derive(Debug, Default)]
pub struct InMemoryChannel {
    /// Cumulative credits per recipient.
    credited: HashMap<PartyId, Decimal>,
    /// Number of transfers executed.
    transfer_count: u64,
}

impl InMemoryChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total credited to a recipient so far.
    #[must_use]
    pub fn balance(&self, recipient: PartyId) -> Decimal {
        self.credited
            .get(&recipient)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Sum of all credits — must equal the sum of accepted transfers.
    #[must_use]
    pub fn total_credited(&self) -> Decimal {
        self.credited.values().copied().sum()
    }

    /// Number of transfers executed.
    #[must_use]
    pub fn transfer_count(&self) -> u64 {
        self.transfer_count
    }
}

impl SettlementChannel for InMemoryChannel {
    fn transfer(&mut self, recipient: PartyId, amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(EscrowError::TransferFailure {
                reason: format!("non-positive transfer amount {amount}"),
            });
        }
        if recipient.is_nil() {
            return Err(EscrowError::TransferFailure {
                reason: "nil recipient".into(),
            });
        }

        *self.credited.entry(recipient).or_insert(Decimal::ZERO) += amount;
        self.transfer_count += 1;

        tracing::info!(
            recipient = %recipient,
            amount = %amount,
            "Settlement transfer executed"
        );
        Ok(())
    }
}
