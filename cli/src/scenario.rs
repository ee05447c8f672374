//! Scripted elections loaded from TOML.
//!
//! Accounts are written either as 64-character hex ids or as human labels;
//! labels map to accounts through [`mayor_crypto::account_from_label`].

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use mayor_crypto::account_from_label;
use mayor_election::ElectionConfig;
use mayor_ledger::Genesis;
use mayor_types::{AccountId, Amount, Commitment, Sigil};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_administrator")]
    pub administrator: String,
    pub election: ElectionSpec,
    /// Initial balance per account.
    #[serde(default)]
    pub funding: BTreeMap<String, u64>,
    /// Balance given to every named account not listed in `funding`.
    #[serde(default)]
    pub default_funding: u64,
    #[serde(default)]
    pub calls: Vec<CallSpec>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionSpec {
    pub candidates: Vec<String>,
    pub escrow: String,
    pub quorum: u64,
    #[serde(default = "default_account")]
    pub account: String,
}

/// A sigil written as a small integer or a 32-byte hex string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SigilSpec {
    Number(u64),
    Text(String),
}

/// One call against the election. `expect` is `"ok"` (the default) or the
/// error kind the call should fail with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum CallSpec {
    Deposit {
        caller: String,
        amount: u64,
        #[serde(default)]
        expect: Option<String>,
    },
    /// Either a precomputed `commitment`, or the ballot to commit to.
    Cast {
        caller: String,
        #[serde(default)]
        commitment: Option<String>,
        #[serde(default)]
        sigil: Option<SigilSpec>,
        #[serde(default)]
        candidate: Option<String>,
        #[serde(default)]
        amount: Option<u64>,
        #[serde(default)]
        expect: Option<String>,
    },
    Open {
        caller: String,
        sigil: SigilSpec,
        candidate: String,
        amount: u64,
        #[serde(default)]
        expect: Option<String>,
    },
    Settle {
        #[serde(default)]
        expect: Option<String>,
    },
    Teardown {
        caller: String,
        #[serde(default)]
        expect: Option<String>,
    },
}

fn default_name() -> String {
    "unnamed scenario".into()
}

fn default_administrator() -> String {
    "admin".into()
}

fn default_account() -> String {
    "election".into()
}

/// Interpret `s` as a hex account id, falling back to a label.
pub fn resolve_account(s: &str) -> AccountId {
    s.parse().unwrap_or_else(|_| account_from_label(s))
}

impl SigilSpec {
    pub fn to_sigil(&self) -> anyhow::Result<Sigil> {
        match self {
            Self::Number(n) => Ok(Sigil::from(*n)),
            Self::Text(s) => s
                .parse()
                .with_context(|| format!("invalid sigil {s:?}")),
        }
    }
}

impl CallSpec {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Deposit { .. } => "deposit",
            Self::Cast { .. } => "cast",
            Self::Open { .. } => "open",
            Self::Settle { .. } => "settle",
            Self::Teardown { .. } => "teardown",
        }
    }

    pub fn caller(&self) -> Option<&str> {
        match self {
            Self::Deposit { caller, .. }
            | Self::Cast { caller, .. }
            | Self::Open { caller, .. }
            | Self::Teardown { caller, .. } => Some(caller),
            Self::Settle { .. } => None,
        }
    }

    pub fn expected(&self) -> &str {
        let expect = match self {
            Self::Deposit { expect, .. }
            | Self::Cast { expect, .. }
            | Self::Open { expect, .. }
            | Self::Settle { expect }
            | Self::Teardown { expect, .. } => expect,
        };
        expect.as_deref().unwrap_or("ok")
    }

    /// The commitment a `cast` submits.
    pub fn commitment(&self) -> anyhow::Result<Option<Commitment>> {
        let Self::Cast {
            commitment,
            sigil,
            candidate,
            amount,
            ..
        } = self
        else {
            return Ok(None);
        };
        if let Some(hex) = commitment {
            let parsed = hex
                .parse()
                .with_context(|| format!("invalid commitment {hex:?}"))?;
            return Ok(Some(parsed));
        }
        match (sigil, candidate, amount) {
            (Some(sigil), Some(candidate), Some(amount)) => Ok(Some(
                mayor_crypto::compute_commitment(
                    &sigil.to_sigil()?,
                    &resolve_account(candidate),
                    Amount::from(*amount),
                ),
            )),
            _ => anyhow::bail!("cast needs either `commitment` or `sigil`, `candidate` and `amount`"),
        }
    }

    /// Every account this call names.
    fn accounts(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.caller().into_iter().collect();
        match self {
            Self::Cast {
                candidate: Some(c), ..
            }
            | Self::Open { candidate: c, .. } => names.push(c),
            _ => {}
        }
        names
    }
}

impl Scenario {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("failed to parse scenario")
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn election_config(&self) -> ElectionConfig {
        ElectionConfig {
            candidates: self
                .election
                .candidates
                .iter()
                .map(|c| resolve_account(c))
                .collect(),
            escrow: resolve_account(&self.election.escrow),
            quorum: self.election.quorum,
            account: resolve_account(&self.election.account),
        }
    }

    pub fn administrator(&self) -> AccountId {
        resolve_account(&self.administrator)
    }

    /// Every account the scenario names, keyed by id, with its label.
    pub fn labels(&self) -> BTreeMap<AccountId, String> {
        let mut names: Vec<&str> = self.election.candidates.iter().map(String::as_str).collect();
        names.push(&self.election.escrow);
        names.push(&self.election.account);
        names.push(&self.administrator);
        names.extend(self.funding.keys().map(String::as_str));
        for call in &self.calls {
            names.extend(call.accounts());
        }
        names
            .into_iter()
            .map(|n| (resolve_account(n), n.to_string()))
            .collect()
    }

    /// Initial balances: explicit funding, plus `default_funding` for every
    /// other named account except the election's own.
    pub fn genesis(&self) -> Genesis {
        let vault = resolve_account(&self.election.account);
        let explicit: BTreeMap<AccountId, u64> = self
            .funding
            .iter()
            .map(|(name, amount)| (resolve_account(name), *amount))
            .collect();
        let mut genesis = Genesis::new();
        for (account, amount) in &explicit {
            genesis = genesis.with(*account, Amount::from(*amount));
        }
        if self.default_funding > 0 {
            for account in self.labels().into_keys() {
                if account != vault && !explicit.contains_key(&account) {
                    genesis = genesis.with(account, Amount::from(self.default_funding));
                }
            }
        }
        genesis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [election]
        candidates = ["alice", "bob"]
        escrow = "escrow"
        quorum = 1

        [[calls]]
        call = "deposit"
        caller = "alice"
        amount = 3

        [[calls]]
        call = "cast"
        caller = "carol"
        sigil = 7
        candidate = "bob"
        amount = 2

        [[calls]]
        call = "settle"
        expect = "PhaseViolation"
    "#;

    #[test]
    fn minimal_scenario_uses_defaults() {
        let s = Scenario::from_toml_str(MINIMAL).unwrap();
        assert_eq!(s.name, "unnamed scenario");
        assert_eq!(s.administrator, "admin");
        assert_eq!(s.election.account, "election");
        assert_eq!(s.calls.len(), 3);
        assert_eq!(s.calls[0].expected(), "ok");
        assert_eq!(s.calls[2].expected(), "PhaseViolation");
        assert_eq!(s.calls[2].caller(), None);
        s.election_config().validate().unwrap();
    }

    #[test]
    fn cast_commitment_is_computed_from_ballot() {
        let s = Scenario::from_toml_str(MINIMAL).unwrap();
        let expected = mayor_crypto::compute_commitment(
            &Sigil::from(7),
            &account_from_label("bob"),
            Amount::new(2),
        );
        assert_eq!(s.calls[1].commitment().unwrap(), Some(expected));
        assert_eq!(s.calls[0].commitment().unwrap(), None);
    }

    #[test]
    fn cast_without_ballot_or_commitment_fails() {
        let call = CallSpec::Cast {
            caller: "carol".into(),
            commitment: None,
            sigil: None,
            candidate: Some("bob".into()),
            amount: None,
            expect: None,
        };
        assert!(call.commitment().is_err());
    }

    #[test]
    fn accounts_resolve_hex_or_label() {
        let hex = "ab".repeat(32);
        assert_eq!(resolve_account(&hex), AccountId::new([0xab; 32]));
        assert_eq!(resolve_account("alice"), account_from_label("alice"));
    }

    #[test]
    fn default_funding_covers_named_accounts_but_not_the_vault() {
        let mut s = Scenario::from_toml_str(MINIMAL).unwrap();
        s.default_funding = 100;
        s.funding.insert("alice".into(), 5);
        let ledger = s.genesis().build().unwrap();
        use mayor_ledger::Ledger;
        assert_eq!(ledger.balance(&account_from_label("alice")), Amount::new(5));
        assert_eq!(ledger.balance(&account_from_label("carol")), Amount::new(100));
        assert_eq!(ledger.balance(&account_from_label("election")), Amount::ZERO);
        assert!(s.labels().values().any(|l| l == "bob"));
    }

    #[test]
    fn shipped_scenarios_parse() {
        for text in [
            include_str!("../scenarios/scenario_a.toml"),
            include_str!("../scenarios/scenario_b.toml"),
            include_str!("../scenarios/scenario_c.toml"),
        ] {
            let s = Scenario::from_toml_str(text).unwrap();
            s.election_config().validate().unwrap();
        }
    }
}
