//! Fault-injecting settlement channel for tests. **Never use in production.**
//!
//! Wraps [`InMemoryChannel`] with a scriptable verdict queue: each upcoming
//! transfer can be told to deliver or to fail cleanly. Calls with no queued
//! verdict deliver.

use std::collections::VecDeque;

use openescrow_types::{EscrowError, PartyId, Result, SettlementChannel};
use rust_decimal::Decimal;

use crate::InMemoryChannel;

/// Scripted outcome for one upcoming transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Deliver,
    Reject,
}

/// A settlement channel that fails on demand.
#[derive(Debug, Default)]
pub struct FaultyChannel {
    inner: InMemoryChannel,
    script: VecDeque<Verdict>,
}

impl FaultyChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a clean failure for the next unscripted transfer slot.
    pub fn fail_next(&mut self) {
        self.script.push_back(Verdict::Reject);
    }

    /// Queue a successful delivery (useful to fail the Nth call: queue
    /// N-1 deliveries first).
    pub fn deliver_next(&mut self) {
        self.script.push_back(Verdict::Deliver);
    }

    /// Total credited to a recipient by delivered transfers.
    #[must_use]
    pub fn balance(&self, recipient: PartyId) -> Decimal {
        self.inner.balance(recipient)
    }

    /// Sum of all delivered credits.
    #[must_use]
    pub fn total_credited(&self) -> Decimal {
        self.inner.total_credited()
    }
}

impl SettlementChannel for FaultyChannel {
    fn transfer(&mut self, recipient: PartyId, amount: Decimal) -> Result<()> {
        match self.script.pop_front().unwrap_or(Verdict::Deliver) {
            Verdict::Deliver => self.inner.transfer(recipient, amount),
            Verdict::Reject => Err(EscrowError::TransferFailure {
                reason: "injected channel failure".into(),
            }),
        }
    }
}
