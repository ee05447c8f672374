//! Replays a [`Scenario`] against a fresh in-memory ledger and reports
//! every call, notification and balance change.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::mpsc;

use serde::Serialize;

use mayor_election::{Election, ElectionEvent, ElectionSummary, Outcome};
use mayor_ledger::{BalanceSnapshot, MemLedger};
use mayor_types::{AccountId, Amount};

use crate::scenario::{resolve_account, CallSpec, Scenario};

#[derive(Clone, Debug, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub call: &'static str,
    pub caller: Option<String>,
    /// `"ok"` or the error kind.
    pub result: String,
    pub reason: Option<String>,
    pub expected: String,
    pub matched: bool,
    pub events: Vec<ElectionEvent>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BalanceLine {
    pub label: String,
    pub account: AccountId,
    pub before: Amount,
    pub after: Amount,
    pub change: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub name: String,
    pub steps: Vec<StepReport>,
    pub outcome: Option<Outcome>,
    pub summary: ElectionSummary,
    pub balances: Vec<BalanceLine>,
    /// Set when `--fail-fast` stopped the replay early.
    pub stopped_early: bool,
}

impl Report {
    pub fn mismatches(&self) -> usize {
        self.steps.iter().filter(|s| !s.matched).count()
    }

    /// Plain-text rendering with accounts shown by label.
    pub fn render(&self, labels: &BTreeMap<AccountId, String>) -> String {
        let name = |id: &AccountId| labels.get(id).cloned().unwrap_or_else(|| id.to_string());
        let mut out = String::new();
        let _ = writeln!(out, "scenario: {}", self.name);
        for step in &self.steps {
            let mark = if step.matched { " " } else { "!" };
            let caller = step.caller.as_deref().unwrap_or("-");
            let _ = write!(out, "{mark} #{:<3} {:<9} {:<12} {}", step.index, step.call, caller, step.result);
            if let Some(reason) = &step.reason {
                let _ = write!(out, " ({reason})");
            }
            if !step.matched {
                let _ = write!(out, " [expected {}]", step.expected);
            }
            out.push('\n');
            for event in &step.events {
                let _ = writeln!(out, "      -> {}", describe(event, &name));
            }
        }
        let outcome = match self.outcome {
            Some(Outcome::Winner(id)) => format!("winner {}", name(&id)),
            Some(Outcome::Tie) => "tie".to_string(),
            None => "undecided".to_string(),
        };
        let s = &self.summary;
        let _ = writeln!(
            out,
            "outcome: {outcome} (phase {}, deposits {}, cast {}/{}, opened {})",
            s.phase, s.candidates_deposited, s.envelopes_cast, s.quorum, s.envelopes_opened
        );
        let _ = writeln!(out, "balances:");
        for line in &self.balances {
            let _ = writeln!(
                out,
                "  {:<12} {:>8} -> {:>8}  {:>6}",
                line.label, line.before, line.after, line.change
            );
        }
        out
    }
}

fn describe(event: &ElectionEvent, name: &dyn Fn(&AccountId) -> String) -> String {
    match event {
        ElectionEvent::Deposited { candidate, amount } => {
            format!("Deposited({amount}) by {}", name(candidate))
        }
        ElectionEvent::EnvelopeCast { voter } => format!("EnvelopeCast by {}", name(voter)),
        ElectionEvent::EnvelopeOpened {
            voter,
            amount,
            candidate,
        } => format!(
            "EnvelopeOpened({amount}, {}) by {}",
            name(candidate),
            name(voter)
        ),
        ElectionEvent::WinnerDeclared { candidate } => {
            format!("WinnerDeclared({})", name(candidate))
        }
        ElectionEvent::TieDeclared { escrow } => format!("TieDeclared(escrow {})", name(escrow)),
    }
}

/// Replay `scenario`. Scenario-level problems (bad config, malformed call)
/// are errors; election rejections are recorded in the report.
pub fn run(scenario: &Scenario, fail_fast: bool) -> anyhow::Result<Report> {
    let labels = scenario.labels();
    let mut ledger: MemLedger = scenario.genesis().build()?;
    let mut election = Election::new(scenario.election_config(), scenario.administrator())?;

    let (tx, rx) = mpsc::channel::<ElectionEvent>();
    election.subscribe(Box::new(move |event| {
        let _ = tx.send(event.clone());
    }));

    let before = BalanceSnapshot::capture(&ledger, labels.keys().copied());
    let mut steps = Vec::with_capacity(scenario.calls.len());
    let mut stopped_early = false;

    for (index, call) in scenario.calls.iter().enumerate() {
        let result = apply(&mut election, &mut ledger, call)?;
        let (result, reason) = match result {
            Ok(()) => ("ok".to_string(), None),
            Err(e) => (e.kind().to_string(), Some(e.to_string())),
        };
        let expected = call.expected().to_string();
        let matched = result == expected;
        if !matched {
            tracing::warn!(index, call = call.name(), %result, %expected, "unexpected result");
        }
        steps.push(StepReport {
            index,
            call: call.name(),
            caller: call.caller().map(str::to_string),
            result,
            reason,
            expected,
            matched,
            events: rx.try_iter().collect(),
        });
        if fail_fast && !matched {
            stopped_early = true;
            break;
        }
    }

    let balances = before
        .delta(&ledger)
        .into_iter()
        .map(|d| BalanceLine {
            label: labels
                .get(&d.account)
                .cloned()
                .unwrap_or_else(|| d.account.to_string()),
            account: d.account,
            before: d.before,
            after: d.after,
            change: d.to_string(),
        })
        .collect();

    Ok(Report {
        name: scenario.name.clone(),
        steps,
        outcome: election.outcome(),
        summary: election.summary(),
        balances,
        stopped_early,
    })
}

fn apply(
    election: &mut Election,
    ledger: &mut MemLedger,
    call: &CallSpec,
) -> anyhow::Result<Result<(), mayor_election::ElectionError>> {
    Ok(match call {
        CallSpec::Deposit { caller, amount, .. } => {
            election.deposit(ledger, resolve_account(caller), Amount::from(*amount))
        }
        CallSpec::Cast { caller, .. } => {
            let commitment = call
                .commitment()?
                .ok_or_else(|| anyhow::anyhow!("cast without commitment"))?;
            election.cast(resolve_account(caller), commitment)
        }
        CallSpec::Open {
            caller,
            sigil,
            candidate,
            amount,
            ..
        } => election.open(
            ledger,
            resolve_account(caller),
            &sigil.to_sigil()?,
            resolve_account(candidate),
            Amount::from(*amount),
        ),
        CallSpec::Settle { .. } => election.settle(ledger).map(|_| ()),
        CallSpec::Teardown { caller, .. } => election
            .teardown(ledger, resolve_account(caller))
            .map(|_| ()),
    })
}
