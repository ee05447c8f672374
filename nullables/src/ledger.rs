//! Nullable ledger: an in-memory ledger that records batches and can be
//! told to refuse them.

use mayor_ledger::{Genesis, Ledger, LedgerError, MemLedger, Transfer};
use mayor_types::{AccountId, Amount};

/// A test ledger wrapping [`MemLedger`].
///
/// Every successfully applied batch is recorded. A programmed failure makes
/// the next `apply` (or the n-th from now) return
/// [`LedgerError::Rejected`] without touching any balance.
#[derive(Default)]
pub struct NullLedger {
    inner: MemLedger,
    applied: Vec<Vec<Transfer>>,
    fail_after: Option<usize>,
    calls: usize,
}

impl NullLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the balances in `genesis`.
    pub fn funded(genesis: &Genesis) -> Result<Self, LedgerError> {
        Ok(Self {
            inner: genesis.build()?,
            ..Self::default()
        })
    }

    pub fn credit(&mut self, account: AccountId, amount: Amount) -> Result<(), LedgerError> {
        self.inner.credit(account, amount)
    }

    /// Refuse the next batch.
    pub fn fail_next(&mut self) {
        self.fail_after(0);
    }

    /// Let `n` batches through, then refuse the one after.
    pub fn fail_after(&mut self, n: usize) {
        self.fail_after = Some(n);
    }

    /// Batches applied so far (for assertions).
    pub fn applied(&self) -> &[Vec<Transfer>] {
        &self.applied
    }

    /// Number of `apply` calls, including refused ones.
    pub fn calls(&self) -> usize {
        self.calls
    }

    pub fn inner(&self) -> &MemLedger {
        &self.inner
    }

    pub fn total_supply(&self) -> Option<Amount> {
        self.inner.total_supply()
    }
}

impl Ledger for NullLedger {
    fn balance(&self, account: &AccountId) -> Amount {
        self.inner.balance(account)
    }

    fn apply(&mut self, transfers: &[Transfer]) -> Result<(), LedgerError> {
        self.calls += 1;
        match self.fail_after {
            Some(0) => {
                self.fail_after = None;
                return Err(LedgerError::Rejected {
                    reason: "null ledger programmed to fail".into(),
                });
            }
            Some(n) => self.fail_after = Some(n - 1),
            None => {}
        }
        self.inner.apply(transfers)?;
        self.applied.push(transfers.to_vec());
        Ok(())
    }
}
