#![allow(dead_code)]

use paychan::{
    clock::ManualClock, config::AdjudicatorConfig, ledger::InMemoryLedger,
    sig::AcceptAnySignature, wire::EventLog, Address, Adjudicator, Amount,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

pub type TestAdjudicator = Adjudicator<InMemoryLedger, ManualClock, AcceptAnySignature, EventLog>;

/// Routes `tracing` output through the test harness. Filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct Parties {
    pub alice: Address,
    pub bob: Address,
    pub mallory: Address,
    pub custody: Address,
}

impl Parties {
    pub fn random(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self {
            alice: rng.gen(),
            bob: rng.gen(),
            mallory: rng.gen(),
            custody: rng.gen(),
        }
    }
}

/// Adjudicator with the default config, a fresh clock, and `funds` minted to
/// alice and bob each.
pub fn setup(funds: u64) -> (TestAdjudicator, Parties) {
    init_tracing();
    let parties = Parties::random(0);
    let ledger = InMemoryLedger::new();
    ledger.mint(parties.alice, Amount::from(funds)).unwrap();
    ledger.mint(parties.bob, Amount::from(funds)).unwrap();
    let adj = Adjudicator::new(
        AdjudicatorConfig::with_custody(parties.custody),
        ledger,
        ManualClock::new(),
        AcceptAnySignature,
        EventLog::default(),
    );
    (adj, parties)
}
