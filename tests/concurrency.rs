mod common;

use std::{collections::HashSet, sync::Arc};

use common::setup;
use paychan::{
    channel::{BalanceUpdate, SignedUpdate},
    Amount, Error, Signature,
};

const CREATORS: u64 = 32;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creations_get_distinct_ids() {
    let (adj, p) = setup(1_000_000);
    let adj = Arc::new(adj);

    let handles: Vec<_> = (0..CREATORS)
        .map(|i| {
            let adj = Arc::clone(&adj);
            let (alice, bob) = (p.alice, p.bob);
            tokio::task::spawn_blocking(move || {
                adj.create_channel(alice, bob, (i + 1).into(), 1.into(), 500)
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap().unwrap());
    }

    assert_eq!(ids.len() as u64, CREATORS);
    assert_eq!(ids, (1..=CREATORS).collect::<HashSet<_>>());
    assert_eq!(adj.get_channel_count(), CREATORS);

    let locked = (1..=CREATORS)
        .map(|i| Amount::from(i + 1))
        .fold(Amount::zero(), |a, b| a + b);
    assert_eq!(adj.ledger().balance_of(&p.custody), locked);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_responses_only_one_wins_each_nonce() {
    let (adj, p) = setup(10_000);
    let id = adj
        .create_channel(p.alice, p.bob, 1000.into(), 2000.into(), 200)
        .unwrap();
    adj.challenge_close(
        p.alice,
        id,
        SignedUpdate::new(BalanceUpdate::new(3000.into(), 0.into(), 1), [Signature::default(); 2]),
    )
    .unwrap();
    let adj = Arc::new(adj);

    // Both parties answer with the same nonce at the same time.
    let handles: Vec<_> = [(p.alice, 3000u64), (p.bob, 0u64)]
        .into_iter()
        .map(|(caller, a)| {
            let adj = Arc::clone(&adj);
            tokio::task::spawn_blocking(move || {
                let update = BalanceUpdate::new(a.into(), (3000 - a).into(), 2);
                adj.challenge_response(caller, id, SignedUpdate::new(update, [Signature::default(); 2]))
            })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.contains(&Err(Error::InvalidSignature)));
    assert_eq!(adj.get_dispute(id).unwrap().new_nonce, 2);
}
