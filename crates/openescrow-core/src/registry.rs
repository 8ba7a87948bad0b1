//! Registry of independent, concurrently driven trade instances.
//!
//! Each trade is a serially-accessed state machine: the registry hands out
//! `Arc<Mutex<TradeEscrow>>` handles, so every operation on one trade takes
//! exclusive access for the duration of the call while distinct trades
//! proceed fully in parallel with no shared mutable state between them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use openescrow_types::{EscrowPolicy, Result, TradeId, TradeTerms};

use crate::TradeEscrow;

/// Thread-safe map of live trade escrows.
#[derive(Default)]
pub struct EscrowRegistry {
    trades: RwLock<HashMap<TradeId, Arc<Mutex<TradeEscrow>>>>,
}

impl EscrowRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the terms, create the trade, and register it.
    ///
    /// # Errors
    /// Propagates `InvalidArgument` from [`TradeEscrow::new`].
    pub fn open(&self, terms: TradeTerms, policy: EscrowPolicy) -> Result<TradeId> {
        let escrow = TradeEscrow::new(terms, policy)?;
        let id = escrow.id();
        self.trades
            .write()
            .expect("registry lock poisoned")
            .insert(id, Arc::new(Mutex::new(escrow)));
        Ok(id)
    }

    /// Exclusive handle to a trade, if registered.
    #[must_use]
    pub fn get(&self, id: TradeId) -> Option<Arc<Mutex<TradeEscrow>>> {
        self.trades
            .read()
            .expect("registry lock poisoned")
            .get(&id)
            .cloned()
    }

    #[must_use]
    pub fn contains(&self, id: TradeId) -> bool {
        self.trades
            .read()
            .expect("registry lock poisoned")
            .contains_key(&id)
    }

    /// Number of registered trades.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trades.read().expect("registry lock poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openescrow_types::{EscrowError, TradeState};
    use rust_decimal::Decimal;

    #[test]
    fn open_registers_trade() {
        let registry = EscrowRegistry::new();
        let id = registry
            .open(TradeTerms::dummy(Decimal::ONE), EscrowPolicy::default())
            .unwrap();

        assert!(registry.contains(id));
        assert_eq!(registry.len(), 1);

        let handle = registry.get(id).unwrap();
        let escrow = handle.lock().unwrap();
        assert_eq!(escrow.state(), TradeState::Created);
    }

    #[test]
    fn invalid_terms_register_nothing() {
        let registry = EscrowRegistry::new();
        let err = registry
            .open(TradeTerms::dummy(Decimal::ZERO), EscrowPolicy::default())
            .unwrap_err();
        assert!(matches!(err, EscrowError::InvalidArgument { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn unknown_trade_is_absent() {
        let registry = EscrowRegistry::new();
        assert!(registry.get(TradeId::new()).is_none());
    }

    #[test]
    fn independent_trades_progress_concurrently() {
        let registry = Arc::new(EscrowRegistry::new());

        let ids: Vec<TradeId> = (0..8)
            .map(|_| {
                registry
                    .open(TradeTerms::dummy(Decimal::new(100, 0)), EscrowPolicy::default())
                    .unwrap()
            })
            .collect();

        let handles: Vec<_> = ids
            .iter()
            .map(|&id| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    let handle = registry.get(id).unwrap();
                    let mut escrow = handle.lock().unwrap();
                    let buyer = escrow.parties().buyer;
                    escrow.fund(buyer, Decimal::new(100, 0)).unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        for id in ids {
            let handle = registry.get(id).unwrap();
            let escrow = handle.lock().unwrap();
            assert_eq!(escrow.state(), TradeState::Funded);
            assert_eq!(escrow.held_balance(), Decimal::new(100, 0));
        }
    }
}
