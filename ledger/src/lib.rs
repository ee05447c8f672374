//! The host ledger an election moves value through.
//!
//! The election core never owns balances. It describes value movement as
//! batches of [`Transfer`]s and hands them to a [`Ledger`], which applies a
//! batch completely or not at all.

pub mod error;
pub mod genesis;
pub mod ledger;
pub mod memory;
pub mod snapshot;

pub use error::LedgerError;
pub use genesis::{Allocation, Genesis};
pub use ledger::{Ledger, Transfer};
pub use memory::MemLedger;
pub use snapshot::{BalanceDelta, BalanceSnapshot};
