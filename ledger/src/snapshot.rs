//! Balance snapshots: capture a set of balances at one point and compare
//! them against a later ledger state.
//!
//! The snapshot hash is computed deterministically from the captured
//! balances so a stored snapshot can be checked for tampering.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use mayor_crypto::blake2b_256_multi;
use mayor_types::{AccountId, Amount};

use crate::ledger::Ledger;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    /// Blake2b-256 over the captured balances.
    pub hash: [u8; 32],
    /// Captured balances, ordered by account id.
    pub balances: Vec<(AccountId, Amount)>,
}

/// Change in one account's balance between a snapshot and now.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceDelta {
    pub account: AccountId,
    pub before: Amount,
    pub after: Amount,
}

impl BalanceDelta {
    /// Amount gained, if the balance grew.
    pub fn gained(&self) -> Option<Amount> {
        self.after.checked_sub(self.before).filter(|a| !a.is_zero())
    }

    /// Amount lost, if the balance shrank.
    pub fn lost(&self) -> Option<Amount> {
        self.before.checked_sub(self.after).filter(|a| !a.is_zero())
    }

    pub fn is_unchanged(&self) -> bool {
        self.before == self.after
    }
}

/// Signed change: `+81`, `-50` or `0`.
impl fmt::Display for BalanceDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = if let Some(gain) = self.gained() {
            format!("+{gain}")
        } else if let Some(loss) = self.lost() {
            format!("-{loss}")
        } else {
            "0".to_string()
        };
        f.pad(&text)
    }
}

impl BalanceSnapshot {
    /// Capture the current balance of each listed account. Duplicates are
    /// captured once.
    pub fn capture<L, I>(ledger: &L, accounts: I) -> Self
    where
        L: Ledger + ?Sized,
        I: IntoIterator<Item = AccountId>,
    {
        let balances: BTreeMap<AccountId, Amount> = accounts
            .into_iter()
            .map(|a| (a, ledger.balance(&a)))
            .collect();
        let mut snap = Self {
            hash: [0u8; 32],
            balances: balances.into_iter().collect(),
        };
        snap.hash = snap.compute_hash();
        snap
    }

    fn compute_hash(&self) -> [u8; 32] {
        let mut parts: Vec<[u8; 48]> = Vec::with_capacity(self.balances.len());
        for (account, amount) in &self.balances {
            let mut entry = [0u8; 48];
            entry[..32].copy_from_slice(account.as_bytes());
            entry[32..].copy_from_slice(&amount.raw().to_be_bytes());
            parts.push(entry);
        }
        let slices: Vec<&[u8]> = parts.iter().map(|p| p.as_slice()).collect();
        blake2b_256_multi(&slices)
    }

    /// Verify the snapshot hash matches the balance data.
    pub fn verify(&self) -> bool {
        self.hash == self.compute_hash()
    }

    pub fn balance_of(&self, account: &AccountId) -> Option<Amount> {
        self.balances
            .iter()
            .find(|(a, _)| a == account)
            .map(|(_, b)| *b)
    }

    /// Sum of captured balances, or `None` on overflow.
    pub fn total(&self) -> Option<Amount> {
        Amount::checked_sum(self.balances.iter().map(|(_, b)| *b))
    }

    /// Per-account change from this snapshot to the ledger's current state.
    pub fn delta<L: Ledger + ?Sized>(&self, ledger: &L) -> Vec<BalanceDelta> {
        self.balances
            .iter()
            .map(|(account, before)| BalanceDelta {
                account: *account,
                before: *before,
                after: ledger.balance(account),
            })
            .collect()
    }
}
