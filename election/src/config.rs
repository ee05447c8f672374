//! Election configuration.
//!
//! Can be loaded from a TOML file via [`ElectionConfig::from_toml_file`] or
//! constructed directly. Loading always validates.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use mayor_types::AccountId;

use crate::error::ElectionError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionConfig {
    /// Candidate accounts, in registration order.
    pub candidates: Vec<AccountId>,
    /// Receives settlement remainders and, on a tie, the whole pool.
    pub escrow: AccountId,
    /// Number of distinct voters that must cast before opening begins.
    #[serde(default = "default_quorum")]
    pub quorum: u64,
    /// The election's own ledger account.
    pub account: AccountId,
}

fn default_quorum() -> u64 {
    1
}

impl ElectionConfig {
    /// Check the construction rules. No election exists unless this passes.
    pub fn validate(&self) -> Result<(), ElectionError> {
        let invalid =
            |msg: String| -> Result<(), ElectionError> { Err(ElectionError::InvalidConfiguration(msg)) };

        if self.candidates.len() < 2 {
            return invalid(format!(
                "need at least 2 candidates, got {}",
                self.candidates.len()
            ));
        }
        let mut seen = HashSet::new();
        for candidate in &self.candidates {
            if candidate.is_null() {
                return invalid("candidate identity is null".into());
            }
            if !seen.insert(*candidate) {
                return invalid(format!("duplicate candidate {candidate}"));
            }
        }
        if self.escrow.is_null() {
            return invalid("escrow identity is null".into());
        }
        if self.quorum == 0 {
            return invalid("quorum must be at least 1".into());
        }
        if self.account.is_null() {
            return invalid("election account is null".into());
        }
        if self.account == self.escrow || seen.contains(&self.account) {
            return invalid("election account must be separate from escrow and candidates".into());
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ElectionError> {
        let config: Self =
            toml::from_str(s).map_err(|e| ElectionError::InvalidConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ElectionError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ElectionError::InvalidConfiguration(format!("{}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, ElectionError> {
        toml::to_string_pretty(self).map_err(|e| ElectionError::InvalidConfiguration(e.to_string()))
    }
}
