//! Genesis funding: the initial balances a fresh ledger starts with.

use serde::{Deserialize, Serialize};

use mayor_types::{AccountId, Amount};

use crate::error::LedgerError;
use crate::memory::MemLedger;

/// One initial balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub account: AccountId,
    pub amount: Amount,
}

/// An ordered list of initial balances.
///
/// Allocations to the same account accumulate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genesis {
    pub allocations: Vec<Allocation>,
}

impl Genesis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, account: AccountId, amount: Amount) -> Self {
        self.allocations.push(Allocation { account, amount });
        self
    }

    /// Total value minted, or `None` on overflow.
    pub fn total(&self) -> Option<Amount> {
        Amount::checked_sum(self.allocations.iter().map(|a| a.amount))
    }

    /// Build a ledger funded with every allocation.
    pub fn build(&self) -> Result<MemLedger, LedgerError> {
        let mut ledger = MemLedger::new();
        for allocation in &self.allocations {
            ledger.credit(allocation.account, allocation.amount)?;
        }
        Ok(ledger)
    }
}
