//! Ledger collaborator trait.

use mayor_types::{AccountId, Amount};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// A single value movement between two accounts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: AccountId,
    pub to: AccountId,
    pub amount: Amount,
}

impl Transfer {
    pub fn new(from: AccountId, to: AccountId, amount: Amount) -> Self {
        Self { from, to, amount }
    }
}

/// Atomic value transfer between accounts.
///
/// Implementors must apply a batch all-or-nothing: when `apply` returns an
/// error no balance has changed.
pub trait Ledger {
    /// Current balance of `account` (zero for unknown accounts).
    fn balance(&self, account: &AccountId) -> Amount;

    /// Apply every transfer in order, or none of them.
    fn apply(&mut self, transfers: &[Transfer]) -> Result<(), LedgerError>;

    /// Move `amount` from one account to another.
    fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.apply(&[Transfer::new(from, to, amount)])
    }
}

impl<L: Ledger + ?Sized> Ledger for &mut L {
    fn balance(&self, account: &AccountId) -> Amount {
        (**self).balance(account)
    }

    fn apply(&mut self, transfers: &[Transfer]) -> Result<(), LedgerError> {
        (**self).apply(transfers)
    }
}
