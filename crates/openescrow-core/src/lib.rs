//! # openescrow-core
//!
//! The **TradeEscrow** state machine: role-gated transitions, fund custody
//! invariants, and the dispute/resolution branch.
//!
//! ## Architecture
//!
//! A trade is created with four bound identities and a fixed price, then
//! driven through its lifecycle by role-scoped operations:
//!
//! ```text
//! fund ──▶ set_document_hash / mark_shipped ──▶ confirm_delivery
//!      ──▶ release_payment ──▶ COMPLETED
//!
//! raise_dispute ──▶ resolve_dispute ──▶ COMPLETED | CANCELLED
//! ```
//!
//! Value only ever moves through the [`SettlementChannel`] boundary, with
//! the terminal state committed and the reentrancy guard held before any
//! transfer is issued. Every successful operation appends one record to the
//! trade's append-only audit trail.
//!
//! Independent trades are fully concurrent; [`EscrowRegistry`] hands out
//! per-trade exclusive handles.
//!
//! [`SettlementChannel`]: openescrow_types::SettlementChannel

pub mod escrow;
pub mod registry;

pub use escrow::TradeEscrow;
pub use registry::EscrowRegistry;
