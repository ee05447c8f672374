//! The election data model: candidates, voters, counters and phase.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use mayor_types::{AccountId, Amount, Commitment};

use crate::config::ElectionConfig;
use crate::phase::Phase;
use crate::tally::Outcome;

/// A registered candidate. Presence in the election means "is a candidate";
/// the deposit and tally fields start zeroed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: AccountId,
    pub has_deposited: bool,
    pub deposited: Amount,
    /// Number of opened ballots naming this candidate.
    pub votes: u64,
    /// Sum of revealed ballot amounts naming this candidate.
    pub soul: Amount,
}

impl Candidate {
    pub fn new(id: AccountId) -> Self {
        Self {
            id,
            has_deposited: false,
            deposited: Amount::ZERO,
            votes: 0,
            soul: Amount::ZERO,
        }
    }
}

/// A voter, created on their first cast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub id: AccountId,
    pub commitment: Option<Commitment>,
    pub has_voted: bool,
    pub soul_given: Amount,
    pub voted_for: Option<AccountId>,
}

impl Voter {
    pub fn new(id: AccountId) -> Self {
        Self {
            id,
            commitment: None,
            has_voted: false,
            soul_given: Amount::ZERO,
            voted_for: None,
        }
    }
}

/// Counters and phase as exposed to the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionSummary {
    pub quorum: u64,
    pub envelopes_cast: u64,
    pub envelopes_opened: u64,
    pub candidates_deposited: u64,
    pub phase: Phase,
}

/// Everything an election knows, owned by exactly one [`crate::Election`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionState {
    pub candidates: Vec<Candidate>,
    pub voters: BTreeMap<AccountId, Voter>,
    /// Voters in the order they opened their envelopes.
    pub voted: Vec<AccountId>,
    pub escrow: AccountId,
    pub quorum: u64,
    /// The election's own ledger account holding deposits and ballots.
    pub account: AccountId,
    pub administrator: AccountId,
    pub candidates_deposited: u64,
    pub envelopes_cast: u64,
    pub envelopes_opened: u64,
    pub phase: Phase,
    /// Value received and not yet paid out.
    pub held: Amount,
    pub outcome: Option<Outcome>,
    pub torn_down: bool,
}

impl ElectionState {
    /// Fresh state for an already validated configuration.
    pub(crate) fn new(config: &ElectionConfig, administrator: AccountId) -> Self {
        Self {
            candidates: config.candidates.iter().copied().map(Candidate::new).collect(),
            voters: BTreeMap::new(),
            voted: Vec::new(),
            escrow: config.escrow,
            quorum: config.quorum,
            account: config.account,
            administrator,
            candidates_deposited: 0,
            envelopes_cast: 0,
            envelopes_opened: 0,
            phase: Phase::Depositing,
            held: Amount::ZERO,
            outcome: None,
            torn_down: false,
        }
    }

    pub fn candidate_index(&self, id: &AccountId) -> Option<usize> {
        self.candidates.iter().position(|c| &c.id == id)
    }

    pub fn candidate(&self, id: &AccountId) -> Option<&Candidate> {
        self.candidates.iter().find(|c| &c.id == id)
    }

    pub fn summary(&self) -> ElectionSummary {
        ElectionSummary {
            quorum: self.quorum,
            envelopes_cast: self.envelopes_cast,
            envelopes_opened: self.envelopes_opened,
            candidates_deposited: self.candidates_deposited,
            phase: self.phase,
        }
    }

    /// Check every structural invariant, returning the first violation.
    ///
    /// Holds after every operation, successful or not.
    pub fn check_invariants(&self) -> Result<(), String> {
        let total = self.candidates.len() as u64;
        let deposited = self.candidates.iter().filter(|c| c.has_deposited).count() as u64;
        if deposited != self.candidates_deposited {
            return Err(format!(
                "candidates_deposited {} but {deposited} candidates deposited",
                self.candidates_deposited
            ));
        }
        if self.candidates_deposited > total {
            return Err("more deposits than candidates".into());
        }
        if (self.phase == Phase::Depositing) != (self.candidates_deposited < total) {
            return Err(format!(
                "phase {} with {}/{total} deposits",
                self.phase, self.candidates_deposited
            ));
        }

        if self.envelopes_cast > self.quorum {
            return Err("envelopes_cast exceeds quorum".into());
        }
        let committed = self.voters.values().filter(|v| v.commitment.is_some()).count() as u64;
        if committed != self.envelopes_cast {
            return Err(format!(
                "envelopes_cast {} but {committed} voters committed",
                self.envelopes_cast
            ));
        }
        let reached = self.envelopes_cast == self.quorum;
        let past_casting = self.phase >= Phase::Opening;
        if reached != past_casting {
            return Err(format!(
                "phase {} with {}/{} envelopes",
                self.phase, self.envelopes_cast, self.quorum
            ));
        }

        if self.envelopes_opened > self.envelopes_cast {
            return Err("more envelopes opened than cast".into());
        }
        if self.voted.len() as u64 != self.envelopes_opened {
            return Err("voted list disagrees with envelopes_opened".into());
        }
        for id in &self.voted {
            match self.voters.get(id) {
                Some(v) if v.has_voted => {}
                _ => return Err(format!("voted entry {id} has not voted")),
            }
        }
        let voted_flags = self.voters.values().filter(|v| v.has_voted).count();
        if voted_flags != self.voted.len() {
            return Err("has_voted flags disagree with voted list".into());
        }

        for c in &self.candidates {
            let backers = self
                .voters
                .values()
                .filter(|v| v.voted_for == Some(c.id));
            let votes = backers.clone().count() as u64;
            let soul = Amount::checked_sum(backers.map(|v| v.soul_given))
                .ok_or_else(|| "tally overflow".to_string())?;
            if votes != c.votes || soul != c.soul {
                return Err(format!("tally for candidate {} disagrees with voters", c.id));
            }
        }

        if self.phase.is_terminal() != self.outcome.is_some() {
            return Err("outcome recorded outside a terminal phase".into());
        }
        if self.phase.is_terminal() || self.torn_down {
            if !self.held.is_zero() {
                return Err("value still held after payout".into());
            }
        } else {
            let deposits = Amount::checked_sum(self.candidates.iter().map(|c| c.deposited));
            let ballots = Amount::checked_sum(self.voters.values().map(|v| v.soul_given));
            let expected = deposits
                .zip(ballots)
                .and_then(|(d, b)| d.checked_add(b))
                .ok_or_else(|| "held overflow".to_string())?;
            if expected != self.held {
                return Err(format!("held {} but received {expected}", self.held));
            }
        }
        Ok(())
    }
}
