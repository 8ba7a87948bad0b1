//! # openescrow-types
//!
//! Shared types, errors, and configuration for the **OpenEscrow** engine.
//!
//! Leaf crate of the workspace: both the core state machine and the
//! settlement backends depend on it. It defines:
//!
//! - **Identifiers**: [`TradeId`], [`PartyId`]
//! - **Role model**: [`Role`], [`Parties`] with the authorization check
//! - **Trade terms**: [`TradeTerms`]
//! - **Lifecycle**: [`TradeState`]
//! - **Document model**: [`DocumentHash`]
//! - **Audit model**: [`AuditRecord`], [`Operation`]
//! - **Configuration**: [`EscrowPolicy`], [`ReleasePolicy`]
//! - **Boundary contract**: [`SettlementChannel`]
//! - **Errors**: [`EscrowError`] with `ES_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod audit;
pub mod channel;
pub mod config;
pub mod constants;
pub mod document;
pub mod error;
pub mod ids;
pub mod party;
pub mod state;
pub mod terms;

// Re-export all primary types at crate root for ergonomic imports:
//   use openescrow_types::{TradeState, Parties, EscrowError, ...};

pub use audit::*;
pub use channel::*;
pub use config::*;
pub use document::*;
pub use error::*;
pub use ids::*;
pub use party::*;
pub use state::*;
pub use terms::*;

// Constants are accessed via `openescrow_types::constants::FOO`
// (not re-exported to avoid name collisions).
