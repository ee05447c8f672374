use std::collections::HashMap;

use proptest::prelude::*;

use mayor_election::{Election, ElectionConfig, ElectionEvent, Phase};
use mayor_ledger::{Genesis, Ledger, MemLedger};
use mayor_nullables::EventRecorder;
use mayor_types::{AccountId, Amount, Sigil};

fn id(n: u8) -> AccountId {
    AccountId::new([n + 1; 32])
}

const CANDIDATES: u8 = 3;
const ADMIN: u8 = 50;
const ESCROW: u8 = 51;
const VAULT: u8 = 52;

/// Voter pool: five plain voters, then the election account, the null
/// account, the escrow and a candidate.
const VOTERS: u8 = 9;

fn voter_id(v: u8) -> AccountId {
    match v {
        5 => id(VAULT),
        6 => AccountId::ZERO,
        7 => id(ESCROW),
        8 => id(0),
        n => id(10 + n),
    }
}

#[derive(Clone, Debug)]
enum Call {
    /// `who` 0..=3; 3 is not a candidate.
    Deposit { who: u8, amount: u128 },
    Cast { voter: u8, choice: u8, amount: u128, sigil: u64 },
    /// Reveal the last cast ballot, optionally tampered.
    Open { voter: u8, tamper: bool },
    Settle,
    Teardown { by_admin: bool },
}

fn call_strategy() -> impl Strategy<Value = Call> {
    prop_oneof![
        3 => (0u8..4, 0u128..50).prop_map(|(who, amount)| Call::Deposit { who, amount }),
        4 => (0u8..VOTERS, 0u8..4, 0u128..50, any::<u64>())
            .prop_map(|(voter, choice, amount, sigil)| Call::Cast { voter, choice, amount, sigil }),
        4 => (0u8..VOTERS, prop::bool::weighted(0.2))
            .prop_map(|(voter, tamper)| Call::Open { voter, tamper }),
        2 => Just(Call::Settle),
        1 => prop::bool::weighted(0.5).prop_map(|by_admin| Call::Teardown { by_admin }),
    ]
}

fn ledger() -> MemLedger {
    (0u8..20)
        .chain([ESCROW])
        .fold(Genesis::new(), |g, n| g.with(id(n), Amount::new(10_000)))
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Every call either succeeds with one event, or fails leaving state,
    /// balances and events untouched. Invariants hold throughout and the
    /// election account always holds exactly what the election says it holds.
    #[test]
    fn random_call_sequences_keep_invariants(
        quorum in 1u64..4,
        calls in prop::collection::vec(call_strategy(), 0..60),
    ) {
        let config = ElectionConfig {
            candidates: (0..CANDIDATES).map(id).collect(),
            escrow: id(ESCROW),
            quorum,
            account: id(VAULT),
        };
        let mut election = Election::new(config, id(ADMIN)).unwrap();
        let recorder = EventRecorder::<ElectionEvent>::new();
        election.subscribe(recorder.listener());
        let mut ledger = ledger();
        let supply = ledger.total_supply();
        let mut ballots: HashMap<u8, (u64, u8, u128)> = HashMap::new();

        for call in calls {
            let state = election.state().clone();
            let balances = ledger.accounts();
            let events = recorder.len();

            let (ok, emits) = match &call {
                Call::Deposit { who, amount } => (
                    election.deposit(&mut ledger, id(*who), Amount::new(*amount)).is_ok(),
                    true,
                ),
                Call::Cast { voter, choice, amount, sigil } => {
                    let commitment = Election::compute_commitment(
                        &Sigil::from(*sigil),
                        &id(*choice),
                        Amount::new(*amount),
                    );
                    let ok = election.cast(voter_id(*voter), commitment).is_ok();
                    if ok {
                        ballots.insert(*voter, (*sigil, *choice, *amount));
                    }
                    (ok, true)
                }
                Call::Open { voter, tamper } => {
                    let (sigil, choice, amount) =
                        ballots.get(voter).copied().unwrap_or((0, 0, 0));
                    let amount = if *tamper { amount + 1 } else { amount };
                    (
                        election
                            .open(&mut ledger, voter_id(*voter), &Sigil::from(sigil), id(choice), Amount::new(amount))
                            .is_ok(),
                        true,
                    )
                }
                Call::Settle => (election.settle(&mut ledger).is_ok(), true),
                Call::Teardown { by_admin } => {
                    let caller = if *by_admin { id(ADMIN) } else { id(0) };
                    (election.teardown(&mut ledger, caller).is_ok(), false)
                }
            };

            prop_assert!(election.state().check_invariants().is_ok(),
                "{:?} after {:?}", election.state().check_invariants(), call);
            prop_assert_eq!(ledger.total_supply(), supply);

            if ok {
                let expected = if emits { events + 1 } else { events };
                prop_assert_eq!(recorder.len(), expected);
            } else {
                prop_assert_eq!(election.state(), &state);
                prop_assert_eq!(ledger.accounts(), balances);
                prop_assert_eq!(recorder.len(), events);
            }

            let voters = &election.state().voters;
            prop_assert!(!voters.contains_key(&id(VAULT)));
            prop_assert!(!voters.contains_key(&AccountId::ZERO));

            if !election.is_torn_down() {
                prop_assert_eq!(ledger.balance(&id(VAULT)), election.held());
            }
            if election.phase().is_terminal() {
                prop_assert_eq!(ledger.balance(&id(VAULT)), Amount::ZERO);
            }
        }
    }

    /// Honest voters always reach a terminal phase and are paid out in full.
    #[test]
    fn honest_elections_always_settle(
        deposits in prop::collection::vec(0u128..100, 3),
        ballots in prop::collection::vec((0u8..3, 0u128..100), 1..6),
    ) {
        let config = ElectionConfig {
            candidates: (0..CANDIDATES).map(id).collect(),
            escrow: id(ESCROW),
            quorum: ballots.len() as u64,
            account: id(VAULT),
        };
        let mut election = Election::new(config, id(ADMIN)).unwrap();
        let mut ledger = ledger();

        for (i, amount) in deposits.iter().enumerate() {
            election.deposit(&mut ledger, id(i as u8), Amount::new(*amount)).unwrap();
        }
        for (i, (choice, amount)) in ballots.iter().enumerate() {
            let c = Election::compute_commitment(&Sigil::from(i as u64), &id(*choice), Amount::new(*amount));
            election.cast(id(10 + i as u8), c).unwrap();
        }
        for (i, (choice, amount)) in ballots.iter().enumerate() {
            election
                .open(&mut ledger, id(10 + i as u8), &Sigil::from(i as u64), id(*choice), Amount::new(*amount))
                .unwrap();
        }

        let total: u128 = deposits.iter().sum::<u128>() + ballots.iter().map(|(_, a)| a).sum::<u128>();
        prop_assert_eq!(ledger.balance(&id(VAULT)), Amount::new(total));
        election.settle(&mut ledger).unwrap();
        prop_assert!(matches!(election.phase(), Phase::Settled | Phase::Tied));
        prop_assert_eq!(ledger.balance(&id(VAULT)), Amount::ZERO);
    }
}
