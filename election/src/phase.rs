//! Election phases.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The phases of an election, in the only order they can occur.
///
/// `Settled` and `Tied` are terminal and mutually exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Candidates stake their deposits.
    Depositing,
    /// Voters submit (and may replace) sealed envelopes until quorum.
    Casting,
    /// Voters reveal their ballots.
    Opening,
    /// A winner was declared and paid out.
    Settled,
    /// No single winner; the pool went to escrow.
    Tied,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Settled | Self::Tied)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Depositing => "Depositing",
            Self::Casting => "Casting",
            Self::Opening => "Opening",
            Self::Settled => "Settled",
            Self::Tied => "Tied",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_settled_and_tied_are_terminal() {
        assert!(!Phase::Depositing.is_terminal());
        assert!(!Phase::Casting.is_terminal());
        assert!(!Phase::Opening.is_terminal());
        assert!(Phase::Settled.is_terminal());
        assert!(Phase::Tied.is_terminal());
    }

    #[test]
    fn phases_are_ordered() {
        assert!(Phase::Depositing < Phase::Casting);
        assert!(Phase::Casting < Phase::Opening);
        assert!(Phase::Opening < Phase::Settled);
    }
}
