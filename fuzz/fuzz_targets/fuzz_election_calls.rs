#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use mayor_election::{Election, ElectionConfig};
use mayor_ledger::{Genesis, Ledger};
use mayor_types::{AccountId, Amount, Sigil};

#[derive(Arbitrary, Debug)]
enum Call {
    Deposit { who: u8, amount: u16 },
    Cast { voter: u8, choice: u8, amount: u16, sigil: u8 },
    Open { voter: u8, choice: u8, amount: u16, sigil: u8 },
    Settle,
    Teardown { who: u8 },
}

#[derive(Arbitrary, Debug)]
struct Input {
    candidates: u8,
    quorum: u8,
    calls: Vec<Call>,
}

fn id(n: u8) -> AccountId {
    let mut bytes = [0u8; 32];
    bytes[0] = 1;
    bytes[31] = n;
    AccountId::new(bytes)
}

fn voter_id(v: u8) -> AccountId {
    match v % 26 {
        24 => id(201),
        25 => AccountId::ZERO,
        n => id(8 + n),
    }
}

// Drive arbitrary call sequences through an election. Calls never panic,
// invariants hold after every call, and the election account always holds
// exactly what the election believes it holds.
fuzz_target!(|input: Input| {
    let candidates = 2 + input.candidates % 4;
    let config = ElectionConfig {
        candidates: (0..candidates).map(id).collect(),
        escrow: id(200),
        quorum: 1 + u64::from(input.quorum % 6),
        account: id(201),
    };
    let Ok(mut election) = Election::new(config, id(202)) else {
        return;
    };
    let Ok(mut ledger) = (0u8..=32)
        .fold(Genesis::new(), |g, n| g.with(id(n), Amount::new(1_000_000)))
        .build()
    else {
        return;
    };
    let supply = ledger.total_supply();

    for call in input.calls.iter().take(256) {
        let _ = match *call {
            Call::Deposit { who, amount } => {
                election.deposit(&mut ledger, id(who % 8), Amount::from(u64::from(amount)))
            }
            Call::Cast { voter, choice, amount, sigil } => {
                let c = Election::compute_commitment(
                    &Sigil::from(u64::from(sigil)),
                    &id(choice % 8),
                    Amount::from(u64::from(amount)),
                );
                election.cast(voter_id(voter), c)
            }
            Call::Open { voter, choice, amount, sigil } => election.open(
                &mut ledger,
                voter_id(voter),
                &Sigil::from(u64::from(sigil)),
                id(choice % 8),
                Amount::from(u64::from(amount)),
            ),
            Call::Settle => election.settle(&mut ledger).map(|_| ()),
            Call::Teardown { who } => {
                let caller = if who % 2 == 0 { id(202) } else { id(who) };
                election.teardown(&mut ledger, caller).map(|_| ())
            }
        };

        if let Err(violation) = election.state().check_invariants() {
            panic!("invariant broken after {call:?}: {violation}");
        }
        assert_eq!(ledger.total_supply(), supply);
        if !election.is_torn_down() {
            assert_eq!(ledger.balance(&id(201)), election.held());
        }
    }
});
