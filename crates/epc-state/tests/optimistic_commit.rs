//! Two operations executed against the same snapshot: the first to commit
//! wins, the second aborts and leaves no trace.

use epc_state::{
    CommitOutcome, CommitUnit, MemoryStore, StateTxn, TxContext, Version, VersionedStore,
};
use epc_types::{AccountId, EventName, LedgerEvent, StateKey, TxId, testing::timestamp};

fn ctx(seq: u64) -> TxContext {
    TxContext::new(TxId::new(format!("tx-{seq}")), timestamp(i64::try_from(seq).unwrap()))
}

fn counter(store: &MemoryStore, key: &StateKey) -> u64 {
    store
        .get(key)
        .unwrap()
        .map_or(0, |v| String::from_utf8(v.value).unwrap().parse().unwrap())
}

/// Read-increment-write of a counter key, executed but not committed.
fn increment(store: &MemoryStore, seq: u64, key: &StateKey) -> CommitUnit {
    let mut txn = StateTxn::new(store, ctx(seq));
    let current = txn
        .get(key)
        .unwrap()
        .map_or(0, |b| String::from_utf8(b).unwrap().parse::<u64>().unwrap());
    txn.put(key.clone(), (current + 1).to_string().into_bytes())
        .unwrap();
    txn.emit(LedgerEvent::new(EventName::Mint, Vec::new())).unwrap();
    txn.into_commit_unit().unwrap()
}

#[test]
fn first_committer_wins() {
    let key = StateKey::balance(&AccountId::new("alice"));
    let mut store = MemoryStore::new();

    let a = increment(&store, 1, &key);
    let b = increment(&store, 2, &key);

    let first = store.commit(a).unwrap();
    assert!(first.is_committed());
    assert_eq!(first.events().len(), 1);

    let second = store.commit(b).unwrap();
    match second {
        CommitOutcome::Aborted(conflict) => {
            assert_eq!(conflict.key, key);
            assert_eq!(conflict.expected, None);
            assert_eq!(conflict.found, Some(Version(1)));
        }
        CommitOutcome::Committed { .. } => panic!("stale read must not commit"),
    }

    assert_eq!(counter(&store, &key), 1);
    assert_eq!(store.history(&key).unwrap().len(), 1);
    assert_eq!(store.height(), Version(1));
}

#[test]
fn retry_after_abort_sees_new_state() {
    let key = StateKey::Supply;
    let mut store = MemoryStore::new();

    let a = increment(&store, 1, &key);
    let b = increment(&store, 2, &key);
    assert!(store.commit(a).unwrap().is_committed());
    assert!(!store.commit(b).unwrap().is_committed());

    let retried = increment(&store, 2, &key);
    assert!(store.commit(retried).unwrap().is_committed());
    assert_eq!(counter(&store, &key), 2);
}

#[test]
fn disjoint_keys_both_commit() {
    let alice = StateKey::balance(&AccountId::new("alice"));
    let bob = StateKey::balance(&AccountId::new("bob"));
    let mut store = MemoryStore::new();

    let a = increment(&store, 1, &alice);
    let b = increment(&store, 2, &bob);
    assert!(store.commit(a).unwrap().is_committed());
    assert!(store.commit(b).unwrap().is_committed());
    assert_eq!(store.height(), Version(2));
}

#[test]
fn replicas_produce_identical_digests() {
    let key = StateKey::Supply;
    let mut left = MemoryStore::new();
    let mut right = MemoryStore::new();

    for seq in 1..=5 {
        let unit = increment(&left, seq, &key);
        left.commit(unit).unwrap();
        let unit = increment(&right, seq, &key);
        right.commit(unit).unwrap();
    }

    let digests = |s: &MemoryStore| s.receipts().iter().map(|r| r.digest).collect::<Vec<_>>();
    assert_eq!(digests(&left), digests(&right));
}
