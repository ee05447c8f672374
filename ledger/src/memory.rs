//! In-memory ledger with atomic batch application.

use std::collections::HashMap;

use mayor_types::{AccountId, Amount};

use crate::error::LedgerError;
use crate::ledger::{Ledger, Transfer};

#[derive(Clone, Debug, Default)]
pub struct MemLedger {
    balances: HashMap<AccountId, Amount>,
}

impl MemLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` into `account`. Used for genesis funding only.
    pub fn credit(&mut self, account: AccountId, amount: Amount) -> Result<(), LedgerError> {
        if account.is_null() {
            return Err(LedgerError::NullAccount);
        }
        let updated = self
            .balance(&account)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.balances.insert(account, updated);
        Ok(())
    }

    /// Sum of every balance, or `None` if it does not fit in an `Amount`.
    pub fn total_supply(&self) -> Option<Amount> {
        Amount::checked_sum(self.balances.values().copied())
    }

    /// All known accounts and their balances, ordered by account id.
    pub fn accounts(&self) -> Vec<(AccountId, Amount)> {
        let mut accounts: Vec<_> = self.balances.iter().map(|(a, b)| (*a, *b)).collect();
        accounts.sort_by(|a, b| a.0.cmp(&b.0));
        accounts
    }
}

impl Ledger for MemLedger {
    fn balance(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or(Amount::ZERO)
    }

    fn apply(&mut self, transfers: &[Transfer]) -> Result<(), LedgerError> {
        let mut staged: HashMap<AccountId, Amount> = HashMap::new();

        for t in transfers {
            if t.from.is_null() || t.to.is_null() {
                return Err(LedgerError::NullAccount);
            }
            let available = staged
                .get(&t.from)
                .copied()
                .unwrap_or_else(|| self.balance(&t.from));
            let debited =
                available
                    .checked_sub(t.amount)
                    .ok_or(LedgerError::InsufficientBalance {
                        account: t.from,
                        needed: t.amount,
                        available,
                    })?;
            staged.insert(t.from, debited);

            let current = staged
                .get(&t.to)
                .copied()
                .unwrap_or_else(|| self.balance(&t.to));
            let credited = current.checked_add(t.amount).ok_or(LedgerError::Overflow)?;
            staged.insert(t.to, credited);
        }

        self.balances.extend(staged);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acct(n: u8) -> AccountId {
        AccountId::new([n; 32])
    }

    fn funded() -> MemLedger {
        let mut ledger = MemLedger::new();
        ledger.credit(acct(1), Amount::new(100)).unwrap();
        ledger.credit(acct(2), Amount::new(10)).unwrap();
        ledger
    }

    #[test]
    fn transfer_moves_value() {
        let mut ledger = funded();
        ledger.transfer(acct(1), acct(3), Amount::new(40)).unwrap();
        assert_eq!(ledger.balance(&acct(1)), Amount::new(60));
        assert_eq!(ledger.balance(&acct(3)), Amount::new(40));
        assert_eq!(ledger.total_supply(), Some(Amount::new(110)));
    }

    #[test]
    fn failed_batch_changes_nothing() {
        let mut ledger = funded();
        let batch = [
            Transfer::new(acct(1), acct(3), Amount::new(50)),
            Transfer::new(acct(2), acct(3), Amount::new(11)),
        ];
        let err = ledger.apply(&batch).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                account: acct(2),
                needed: Amount::new(11),
                available: Amount::new(10),
            }
        );
        assert_eq!(ledger.balance(&acct(1)), Amount::new(100));
        assert_eq!(ledger.balance(&acct(3)), Amount::ZERO);
    }

    #[test]
    fn batch_sees_its_own_earlier_transfers() {
        let mut ledger = funded();
        let batch = [
            Transfer::new(acct(1), acct(3), Amount::new(30)),
            Transfer::new(acct(3), acct(4), Amount::new(30)),
        ];
        ledger.apply(&batch).unwrap();
        assert_eq!(ledger.balance(&acct(3)), Amount::ZERO);
        assert_eq!(ledger.balance(&acct(4)), Amount::new(30));
    }

    #[test]
    fn null_account_is_rejected() {
        let mut ledger = funded();
        assert_eq!(
            ledger.transfer(acct(1), AccountId::ZERO, Amount::new(1)),
            Err(LedgerError::NullAccount)
        );
        assert_eq!(
            ledger.credit(AccountId::ZERO, Amount::new(1)),
            Err(LedgerError::NullAccount)
        );
    }

    #[test]
    fn credit_overflow_is_rejected() {
        let mut ledger = MemLedger::new();
        ledger.credit(acct(1), Amount::new(u128::MAX)).unwrap();
        assert_eq!(
            ledger.credit(acct(1), Amount::new(1)),
            Err(LedgerError::Overflow)
        );
    }

    #[test]
    fn zero_transfer_and_self_transfer_are_noops() {
        let mut ledger = funded();
        ledger.transfer(acct(1), acct(2), Amount::ZERO).unwrap();
        ledger.transfer(acct(1), acct(1), Amount::new(100)).unwrap();
        assert_eq!(ledger.balance(&acct(1)), Amount::new(100));
        assert_eq!(ledger.balance(&acct(2)), Amount::new(10));
    }

    #[test]
    fn accounts_are_sorted() {
        let ledger = funded();
        let ids: Vec<_> = ledger.accounts().into_iter().map(|(a, _)| a).collect();
        assert_eq!(ids, vec![acct(1), acct(2)]);
    }
}
