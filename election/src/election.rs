//! The election aggregate and its operations.
//!
//! Each mutating operation follows the same shape:
//! 1. check guards against the current state
//! 2. compute every new counter and balance with checked arithmetic
//! 3. hand the value movement to the ledger as one batch
//! 4. commit the new state and emit one event
//!
//! A failure in steps 1 to 3 leaves the election untouched.

use tracing::{debug, info, info_span};

use mayor_ledger::{Ledger, Transfer};
use mayor_types::{AccountId, Amount, Commitment, Sigil};

use crate::config::ElectionConfig;
use crate::error::ElectionError;
use crate::event::{ElectionEvent, EventBus, Listener};
use crate::phase::Phase;
use crate::state::{Candidate, ElectionState, ElectionSummary, Voter};
use crate::tally::{plan_settlement, Outcome};

#[derive(Debug)]
pub struct Election {
    state: ElectionState,
    events: EventBus,
}

impl Election {
    /// Create an election in the Depositing phase.
    pub fn new(config: ElectionConfig, administrator: AccountId) -> Result<Self, ElectionError> {
        config.validate()?;
        if administrator.is_null() {
            return Err(ElectionError::InvalidConfiguration(
                "administrator identity is null".into(),
            ));
        }
        info!(
            candidates = config.candidates.len(),
            quorum = config.quorum,
            escrow = %config.escrow,
            account = %config.account,
            "election created"
        );
        Ok(Self {
            state: ElectionState::new(&config, administrator),
            events: EventBus::new(),
        })
    }

    /// The commitment a voter must cast to later open with these values.
    pub fn compute_commitment(sigil: &Sigil, candidate: &AccountId, amount: Amount) -> Commitment {
        mayor_crypto::compute_commitment(sigil, candidate, amount)
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.events.subscribe(listener);
    }

    // ── Operations ──────────────────────────────────────────────────────

    /// Stake `amount` as `caller`'s candidate deposit.
    pub fn deposit<L: Ledger + ?Sized>(
        &mut self,
        ledger: &mut L,
        caller: AccountId,
        amount: Amount,
    ) -> Result<(), ElectionError> {
        let span = info_span!("deposit", caller = %caller, amount = %amount);
        let _enter = span.enter();
        self.try_deposit(ledger, caller, amount)
            .inspect_err(|e| debug!(error = %e, kind = e.kind(), "deposit rejected"))
    }

    fn try_deposit<L: Ledger + ?Sized>(
        &mut self,
        ledger: &mut L,
        caller: AccountId,
        amount: Amount,
    ) -> Result<(), ElectionError> {
        self.ensure_live()?;
        let s = &self.state;
        if s.phase != Phase::Depositing {
            return Err(ElectionError::PhaseViolation {
                phase: s.phase,
                reason: "deposits are closed",
            });
        }
        let idx = s
            .candidate_index(&caller)
            .ok_or(ElectionError::NotCandidate(caller))?;
        if s.candidates[idx].has_deposited {
            return Err(ElectionError::AlreadyDeposited(caller));
        }
        let deposited = s
            .candidates_deposited
            .checked_add(1)
            .ok_or(ElectionError::Overflow)?;
        let held = s.held.checked_add(amount).ok_or(ElectionError::Overflow)?;

        ledger.apply(&[Transfer::new(caller, s.account, amount)])?;

        let s = &mut self.state;
        let candidate = &mut s.candidates[idx];
        candidate.has_deposited = true;
        candidate.deposited = amount;
        s.candidates_deposited = deposited;
        s.held = held;
        if deposited == s.candidates.len() as u64 {
            s.phase = Phase::Casting;
            info!("all candidates deposited, casting open");
        }
        info!(deposited, "deposit accepted");

        self.events.emit(&ElectionEvent::Deposited {
            candidate: caller,
            amount,
        });
        Ok(())
    }

    /// Cast (or replace) `caller`'s sealed envelope.
    pub fn cast(&mut self, caller: AccountId, commitment: Commitment) -> Result<(), ElectionError> {
        let span = info_span!("cast", caller = %caller);
        let _enter = span.enter();
        self.try_cast(caller, commitment)
            .inspect_err(|e| debug!(error = %e, kind = e.kind(), "cast rejected"))
    }

    fn try_cast(&mut self, caller: AccountId, commitment: Commitment) -> Result<(), ElectionError> {
        self.ensure_live()?;
        let s = &self.state;
        match s.phase {
            Phase::Casting => {}
            Phase::Depositing => {
                return Err(ElectionError::PhaseViolation {
                    phase: s.phase,
                    reason: "deposits incomplete",
                })
            }
            _ => {
                return Err(ElectionError::PhaseViolation {
                    phase: s.phase,
                    reason: "quorum reached",
                })
            }
        }
        // Neither can ever open: the null account is refused by the ledger and
        // the election account would pay its own vault.
        if caller.is_null() || caller == s.account {
            return Err(ElectionError::IneligibleVoter(caller));
        }
        let first_cast = s
            .voters
            .get(&caller)
            .map_or(true, |v| v.commitment.is_none());
        let cast = if first_cast {
            s.envelopes_cast
                .checked_add(1)
                .ok_or(ElectionError::Overflow)?
        } else {
            s.envelopes_cast
        };

        let s = &mut self.state;
        s.voters
            .entry(caller)
            .or_insert_with(|| Voter::new(caller))
            .commitment = Some(commitment);
        s.envelopes_cast = cast;
        if cast == s.quorum {
            s.phase = Phase::Opening;
            info!(quorum = s.quorum, "quorum reached, opening begins");
        }
        info!(first_cast, envelopes_cast = cast, "envelope cast");

        self.events.emit(&ElectionEvent::EnvelopeCast { voter: caller });
        Ok(())
    }

    /// Reveal `caller`'s ballot and transfer its amount into the election.
    pub fn open<L: Ledger + ?Sized>(
        &mut self,
        ledger: &mut L,
        caller: AccountId,
        sigil: &Sigil,
        candidate: AccountId,
        amount: Amount,
    ) -> Result<(), ElectionError> {
        let span = info_span!("open", caller = %caller, candidate = %candidate, amount = %amount);
        let _enter = span.enter();
        self.try_open(ledger, caller, sigil, candidate, amount)
            .inspect_err(|e| debug!(error = %e, kind = e.kind(), "open rejected"))
    }

    fn try_open<L: Ledger + ?Sized>(
        &mut self,
        ledger: &mut L,
        caller: AccountId,
        sigil: &Sigil,
        candidate: AccountId,
        amount: Amount,
    ) -> Result<(), ElectionError> {
        self.ensure_live()?;
        let s = &self.state;
        match s.phase {
            Phase::Opening => {}
            Phase::Depositing | Phase::Casting => {
                return Err(ElectionError::PhaseViolation {
                    phase: s.phase,
                    reason: "quorum not reached",
                })
            }
            Phase::Settled | Phase::Tied => {
                return Err(ElectionError::PhaseViolation {
                    phase: s.phase,
                    reason: "election settled",
                })
            }
        }
        let voter = s
            .voters
            .get(&caller)
            .filter(|v| v.commitment.is_some())
            .ok_or(ElectionError::CommitmentNotFound(caller))?;
        if voter.has_voted {
            return Err(ElectionError::AlreadyVoted(caller));
        }
        if voter.commitment != Some(Self::compute_commitment(sigil, &candidate, amount)) {
            return Err(ElectionError::CommitmentMismatch(caller));
        }

        let opened = s
            .envelopes_opened
            .checked_add(1)
            .ok_or(ElectionError::Overflow)?;
        let held = s.held.checked_add(amount).ok_or(ElectionError::Overflow)?;
        let tally = match s.candidate_index(&candidate) {
            Some(idx) => {
                let c = &s.candidates[idx];
                let votes = c.votes.checked_add(1).ok_or(ElectionError::Overflow)?;
                let soul = c.soul.checked_add(amount).ok_or(ElectionError::Overflow)?;
                Some((idx, votes, soul))
            }
            None => {
                debug!("ballot names a non-candidate, counted for nobody");
                None
            }
        };

        ledger.apply(&[Transfer::new(caller, s.account, amount)])?;

        let s = &mut self.state;
        if let Some((idx, votes, soul)) = tally {
            let c: &mut Candidate = &mut s.candidates[idx];
            c.votes = votes;
            c.soul = soul;
        }
        if let Some(voter) = s.voters.get_mut(&caller) {
            voter.has_voted = true;
            voter.soul_given = amount;
            voter.voted_for = Some(candidate);
        }
        s.voted.push(caller);
        s.envelopes_opened = opened;
        s.held = held;
        info!(envelopes_opened = opened, "envelope opened");

        self.events.emit(&ElectionEvent::EnvelopeOpened {
            voter: caller,
            amount,
            candidate,
        });
        Ok(())
    }

    /// Decide the outcome and pay everything out.
    pub fn settle<L: Ledger + ?Sized>(&mut self, ledger: &mut L) -> Result<Outcome, ElectionError> {
        let span = info_span!("settle");
        let _enter = span.enter();
        self.try_settle(ledger)
            .inspect_err(|e| debug!(error = %e, kind = e.kind(), "settle rejected"))
    }

    fn try_settle<L: Ledger + ?Sized>(&mut self, ledger: &mut L) -> Result<Outcome, ElectionError> {
        self.ensure_live()?;
        let s = &self.state;
        if s.phase.is_terminal() {
            return Err(ElectionError::AlreadySettled(s.phase));
        }
        if s.phase != Phase::Opening || s.envelopes_cast != s.quorum {
            return Err(ElectionError::PhaseViolation {
                phase: s.phase,
                reason: "quorum not reached",
            });
        }
        if s.envelopes_opened != s.envelopes_cast {
            return Err(ElectionError::PhaseViolation {
                phase: s.phase,
                reason: "envelopes remain unopened",
            });
        }

        let plan = plan_settlement(s)?;
        let planned = plan.total().ok_or(ElectionError::Overflow)?;
        if planned != s.held {
            return Err(ElectionError::ConservationViolated {
                planned,
                held: s.held,
            });
        }

        ledger.apply(&plan.transfers)?;

        let s = &mut self.state;
        let event = match plan.outcome {
            Outcome::Winner(candidate) => {
                s.phase = Phase::Settled;
                info!(winner = %candidate, paid_out = %planned, transfers = plan.transfers.len(), "winner declared");
                ElectionEvent::WinnerDeclared { candidate }
            }
            Outcome::Tie => {
                s.phase = Phase::Tied;
                info!(escrow = %s.escrow, paid_out = %planned, "tie declared");
                ElectionEvent::TieDeclared { escrow: s.escrow }
            }
        };
        s.outcome = Some(plan.outcome);
        s.held = Amount::ZERO;

        self.events.emit(&event);
        Ok(plan.outcome)
    }

    /// Return the election account's whole balance to the administrator and
    /// disable the election for good.
    pub fn teardown<L: Ledger + ?Sized>(
        &mut self,
        ledger: &mut L,
        caller: AccountId,
    ) -> Result<Amount, ElectionError> {
        let span = info_span!("teardown", caller = %caller);
        let _enter = span.enter();
        self.try_teardown(ledger, caller)
            .inspect_err(|e| debug!(error = %e, kind = e.kind(), "teardown rejected"))
    }

    fn try_teardown<L: Ledger + ?Sized>(
        &mut self,
        ledger: &mut L,
        caller: AccountId,
    ) -> Result<Amount, ElectionError> {
        self.ensure_live()?;
        let s = &self.state;
        if caller != s.administrator {
            return Err(ElectionError::Unauthorized(caller));
        }
        let residual = ledger.balance(&s.account);
        if !residual.is_zero() {
            ledger.apply(&[Transfer::new(s.account, s.administrator, residual)])?;
        }

        let s = &mut self.state;
        s.torn_down = true;
        s.held = Amount::ZERO;
        info!(residual = %residual, phase = %s.phase, "election torn down");
        Ok(residual)
    }

    fn ensure_live(&self) -> Result<(), ElectionError> {
        if self.state.torn_down {
            Err(ElectionError::TornDown)
        } else {
            Ok(())
        }
    }

    // ── Read accessors ──────────────────────────────────────────────────

    pub fn state(&self) -> &ElectionState {
        &self.state
    }

    pub fn candidate_count(&self) -> usize {
        self.state.candidates.len()
    }

    pub fn candidate_at(&self, index: usize) -> Option<&Candidate> {
        self.state.candidates.get(index)
    }

    pub fn candidate(&self, id: &AccountId) -> Option<&Candidate> {
        self.state.candidate(id)
    }

    pub fn voter(&self, id: &AccountId) -> Option<&Voter> {
        self.state.voters.get(id)
    }

    pub fn voted_count(&self) -> usize {
        self.state.voted.len()
    }

    pub fn voted_at(&self, index: usize) -> Option<AccountId> {
        self.state.voted.get(index).copied()
    }

    pub fn commitment_of(&self, id: &AccountId) -> Option<Commitment> {
        self.state.voters.get(id).and_then(|v| v.commitment)
    }

    pub fn summary(&self) -> ElectionSummary {
        self.state.summary()
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn escrow(&self) -> AccountId {
        self.state.escrow
    }

    pub fn administrator(&self) -> AccountId {
        self.state.administrator
    }

    pub fn account(&self) -> AccountId {
        self.state.account
    }

    pub fn held(&self) -> Amount {
        self.state.held
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome
    }

    pub fn is_torn_down(&self) -> bool {
        self.state.torn_down
    }
}
