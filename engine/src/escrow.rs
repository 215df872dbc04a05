use crate::errors::DexError;
use alloy_primitives::{Address, U256};
use std::collections::HashMap;

/// Capability for committing funds against an open order
///
/// A production deployment injects a custodian backed by a real token
/// ledger that can refuse a reservation; the in-tree [`EscrowLedger`]
/// records the commitment without checking an actual balance.
pub trait Custody {
    fn reserve(&mut self, user: Address, token: &str, amount: U256) -> Result<(), DexError>;
}

/// Advisory escrow ledger keyed by (user, token symbol)
///
/// Entries are created lazily on first reservation and only ever grow;
/// no debit path exists. Balances do not represent custody of real
/// tokens.
#[derive(Debug, Clone, Default)]
pub struct EscrowLedger {
    balances: HashMap<(Address, String), U256>,
}

impl EscrowLedger {
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Held balance for (user, token), zero if absent
    pub fn balance(&self, user: &Address, token: &str) -> U256 {
        self.balances
            .get(&(*user, token.to_string()))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(Address, String), &U256)> {
        self.balances.iter()
    }

    /// Restore an entry from persisted state
    pub fn set_balance(&mut self, user: Address, token: impl Into<String>, amount: U256) {
        self.balances.insert((user, token.into()), amount);
    }
}

impl Custody for EscrowLedger {
    fn reserve(&mut self, user: Address, token: &str, amount: U256) -> Result<(), DexError> {
        let entry = self
            .balances
            .entry((user, token.to_string()))
            .or_insert(U256::ZERO);
        *entry = entry.saturating_add(amount);
        Ok(())
    }
}
