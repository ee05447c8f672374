//! Sealed-ballot election for the mayor protocol.
//!
//! Phases: Depositing → Casting → Opening → Settled | Tied
//!
//! Candidates stake a deposit, voters commit to a hidden ballot, and once the
//! quorum of envelopes is cast every voter reveals. Settlement picks the
//! candidate with the most backing (revealed value, then vote count) and
//! redistributes:
//! - the winner's deposit is split evenly across its voters, remainder to escrow
//! - the winner collects its voters' ballots plus every losing deposit
//! - every other voter is refunded
//!
//! A double tie sends the whole pool to escrow instead.
//!
//! Every operation is all-or-nothing: guards and arithmetic are checked and
//! the ledger batch applied before any state is committed.

pub mod config;
pub mod election;
pub mod error;
pub mod event;
pub mod phase;
pub mod state;
pub mod tally;

pub use config::ElectionConfig;
pub use election::Election;
pub use error::ElectionError;
pub use event::{ElectionEvent, EventBus};
pub use phase::Phase;
pub use state::{Candidate, ElectionState, ElectionSummary, Voter};
pub use tally::{decide_outcome, plan_settlement, Outcome, Settlement};
