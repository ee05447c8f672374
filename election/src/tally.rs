//! Winner determination and the settlement payout plan.
//!
//! Both functions are pure: they read an [`ElectionState`] and describe the
//! result. [`crate::Election::settle`] applies the plan.

use serde::{Deserialize, Serialize};

use mayor_ledger::Transfer;
use mayor_types::{AccountId, Amount};

use crate::error::ElectionError;
use crate::state::{Candidate, ElectionState};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "candidate", rename_all = "snake_case")]
pub enum Outcome {
    Winner(AccountId),
    Tie,
}

/// Transfers out of the election account that realise an [`Outcome`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub outcome: Outcome,
    pub transfers: Vec<Transfer>,
}

impl Settlement {
    /// Total value paid out, or `None` on overflow.
    pub fn total(&self) -> Option<Amount> {
        Amount::checked_sum(self.transfers.iter().map(|t| t.amount))
    }
}

/// Two-level tie-break: most revealed value, then most votes among those.
/// Anything still level is a tie.
pub fn decide_outcome(candidates: &[Candidate]) -> Outcome {
    let Some(max_soul) = candidates.iter().map(|c| c.soul).max() else {
        return Outcome::Tie;
    };
    let top: Vec<&Candidate> = candidates.iter().filter(|c| c.soul == max_soul).collect();
    if let [only] = top.as_slice() {
        return Outcome::Winner(only.id);
    }

    let max_votes = top.iter().map(|c| c.votes).max().unwrap_or(0);
    let top: Vec<&Candidate> = top.into_iter().filter(|c| c.votes == max_votes).collect();
    match top.as_slice() {
        [only] => Outcome::Winner(only.id),
        _ => Outcome::Tie,
    }
}

/// Build the payout plan for a fully opened election.
///
/// Winner: each of the winner's voters gets `floor(deposit / n)`, escrow gets
/// the remainder, the winner gets its voters' ballots plus all losing
/// deposits, and every other voter is refunded. Tie: everything held goes to
/// escrow. Zero-value transfers are left out.
pub fn plan_settlement(state: &ElectionState) -> Result<Settlement, ElectionError> {
    let outcome = decide_outcome(&state.candidates);
    let from = state.account;
    let mut transfers = Vec::new();
    let mut push = |to: AccountId, amount: Amount| {
        if !amount.is_zero() {
            transfers.push(Transfer::new(from, to, amount));
        }
    };

    match outcome {
        Outcome::Tie => push(state.escrow, state.held),
        Outcome::Winner(winner_id) => {
            let winner = state
                .candidate(&winner_id)
                .ok_or(ElectionError::NotCandidate(winner_id))?;

            let (backers, others): (Vec<_>, Vec<_>) = state
                .voted
                .iter()
                .filter_map(|id| state.voters.get(id))
                .partition(|v| v.voted_for == Some(winner_id));

            let (share, remainder) = winner
                .deposited
                .split_even(backers.len() as u64)
                .ok_or(ElectionError::WinnerWithoutVoters(winner_id))?;

            let losing_deposits = Amount::checked_sum(
                state
                    .candidates
                    .iter()
                    .filter(|c| c.id != winner_id)
                    .map(|c| c.deposited),
            )
            .ok_or(ElectionError::Overflow)?;
            let backing = Amount::checked_sum(backers.iter().map(|v| v.soul_given))
                .ok_or(ElectionError::Overflow)?;
            let prize = backing
                .checked_add(losing_deposits)
                .ok_or(ElectionError::Overflow)?;

            for voter in &backers {
                push(voter.id, share);
            }
            push(state.escrow, remainder);
            push(winner_id, prize);
            for voter in &others {
                push(voter.id, voter.soul_given);
            }
        }
    }

    Ok(Settlement {
        outcome,
        transfers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(n: u8, soul: u128, votes: u64) -> Candidate {
        Candidate {
            soul: Amount::new(soul),
            votes,
            ..Candidate::new(AccountId::new([n; 32]))
        }
    }

    #[test]
    fn highest_soul_wins() {
        let cands = [candidate(1, 50, 1), candidate(2, 51, 2), candidate(3, 0, 0)];
        assert_eq!(decide_outcome(&cands), Outcome::Winner(AccountId::new([2; 32])));
    }

    #[test]
    fn equal_soul_falls_back_to_votes() {
        let cands = [candidate(1, 50, 2), candidate(2, 50, 1), candidate(3, 50, 0)];
        assert_eq!(decide_outcome(&cands), Outcome::Winner(AccountId::new([1; 32])));
    }

    #[test]
    fn equal_soul_and_votes_is_a_tie() {
        let cands = [candidate(1, 49, 2), candidate(2, 50, 1), candidate(3, 50, 1)];
        assert_eq!(decide_outcome(&cands), Outcome::Tie);
    }

    #[test]
    fn vote_tie_break_only_considers_top_soul() {
        // candidate 1 has the most votes but not the most soul
        let cands = [candidate(1, 10, 5), candidate(2, 20, 1), candidate(3, 20, 1)];
        assert_eq!(decide_outcome(&cands), Outcome::Tie);
    }

    #[test]
    fn all_zero_is_a_tie() {
        let cands = [candidate(1, 0, 0), candidate(2, 0, 0)];
        assert_eq!(decide_outcome(&cands), Outcome::Tie);
    }

    #[test]
    fn settlement_total() {
        let a = AccountId::new([1; 32]);
        let plan = Settlement {
            outcome: Outcome::Tie,
            transfers: vec![
                Transfer::new(a, a, Amount::new(3)),
                Transfer::new(a, a, Amount::new(4)),
            ],
        };
        assert_eq!(plan.total(), Some(Amount::new(7)));
    }
}
