//! # openescrow-settlement
//!
//! Settlement Channel backends for the OpenEscrow engine.
//!
//! The escrow core consumes the [`SettlementChannel`] contract from
//! `openescrow-types`; this crate provides the implementations:
//!
//! - [`InMemoryChannel`]: local atomic ledger. Each transfer either fully
//!   credits the recipient or fails cleanly with no value moved. Tracks
//!   per-recipient balances and the conservation total.
//! - `FaultyChannel` (feature `test-helpers`): wraps the ledger with a
//!   scriptable per-call verdict queue so tests can force a transfer to
//!   fail on demand and exercise the TransferFailure and PartialPayout
//!   paths.
//!
//! [`SettlementChannel`]: openescrow_types::SettlementChannel

pub mod ledger;

#[cfg(any(test, feature = "test-helpers"))]
pub mod faulty;

pub use ledger::InMemoryChannel;

#[cfg(any(test, feature = "test-helpers"))]
pub use faulty::FaultyChannel;
