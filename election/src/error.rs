use mayor_ledger::LedgerError;
use mayor_types::{AccountId, Amount};
use thiserror::Error;

use crate::phase::Phase;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElectionError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("{0} is not a registered candidate")]
    NotCandidate(AccountId),

    #[error("candidate {0} has already deposited")]
    AlreadyDeposited(AccountId),

    #[error("not permitted in {phase} phase: {reason}")]
    PhaseViolation { phase: Phase, reason: &'static str },

    #[error("{0} cannot vote in this election")]
    IneligibleVoter(AccountId),

    #[error("no commitment found for {0}")]
    CommitmentNotFound(AccountId),

    #[error("voter {0} has already opened their envelope")]
    AlreadyVoted(AccountId),

    #[error("revealed ballot does not match the commitment of {0}")]
    CommitmentMismatch(AccountId),

    #[error("election already {0}")]
    AlreadySettled(Phase),

    #[error("{0} is not the administrator")]
    Unauthorized(AccountId),

    #[error("arithmetic overflow")]
    Overflow,

    #[error("ledger transfer failed: {0}")]
    Transfer(#[from] LedgerError),

    #[error("election has been torn down")]
    TornDown,

    #[error("winner {0} has no voters to share its deposit")]
    WinnerWithoutVoters(AccountId),

    #[error("settlement pays out {planned} but the election holds {held}")]
    ConservationViolated { planned: Amount, held: Amount },
}

impl ElectionError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration(_) => "InvalidConfiguration",
            Self::NotCandidate(_) => "NotCandidate",
            Self::AlreadyDeposited(_) => "AlreadyDeposited",
            Self::PhaseViolation { .. } => "PhaseViolation",
            Self::IneligibleVoter(_) => "IneligibleVoter",
            Self::CommitmentNotFound(_) => "CommitmentNotFound",
            Self::AlreadyVoted(_) => "AlreadyVoted",
            Self::CommitmentMismatch(_) => "CommitmentMismatch",
            Self::AlreadySettled(_) => "AlreadySettled",
            Self::Unauthorized(_) => "Unauthorized",
            Self::Overflow => "Overflow",
            Self::Transfer(_) => "Transfer",
            Self::TornDown => "TornDown",
            Self::WinnerWithoutVoters(_) => "WinnerWithoutVoters",
            Self::ConservationViolated { .. } => "ConservationViolated",
        }
    }
}
