use meshsync_crdt::ORSet;
use meshsync_types::ReplicaId;
use std::collections::HashSet;

fn replica(n: u64) -> ReplicaId {
    ReplicaId::new(n)
}

fn elements<E: Eq + std::hash::Hash + Clone>(set: &ORSet<E>) -> HashSet<E> {
    set.iter().cloned().collect()
}

#[test]
fn new_set_is_empty() {
    let set: ORSet<i32> = ORSet::new(replica(10));
    assert!(set.is_empty());
    assert_eq!(set.len(), 0);
    assert_eq!(set.replica_id(), replica(10));
}

#[test]
fn add_and_contains() {
    let mut set = ORSet::new(replica(1));
    set.add(1);
    set.add(2);
    assert!(set.contains(&1));
    assert!(set.contains(&2));
    assert!(!set.contains(&3));
    assert_eq!(set.len(), 2);
}

#[test]
fn add_is_idempotent_for_membership() {
    let mut set = ORSet::new(replica(1));
    set.add("x");
    set.add("x");
    assert_eq!(set.len(), 1);
}

#[test]
fn remove_element() {
    let mut set = ORSet::new(replica(1));
    set.add(1);
    assert!(set.contains(&1));

    assert!(set.remove(&1));
    assert!(!set.contains(&1));
    assert!(set.is_empty());
}

#[test]
fn remove_nonexistent_returns_false() {
    let mut set: ORSet<i32> = ORSet::new(replica(1));
    assert!(!set.remove(&999));
}

#[test]
fn add_after_remove() {
    let mut set = ORSet::new(replica(1));
    set.add(1);
    set.remove(&1);
    set.add(1);
    assert!(set.contains(&1));
}

#[test]
fn iterate_elements() {
    let mut set = ORSet::new(replica(1));
    set.add(1);
    set.add(2);
    set.add(3);
    set.remove(&2);
    assert_eq!(elements(&set), HashSet::from([1, 3]));
}

#[test]
fn local_version_advances_on_add() {
    let mut set = ORSet::new(replica(4));
    set.add("a");
    let first = set
        .versions()
        .find(|(r, _)| **r == replica(4))
        .map(|(_, t)| *t)
        .unwrap();

    set.add("b");
    let second = set
        .versions()
        .find(|(r, _)| **r == replica(4))
        .map(|(_, t)| *t)
        .unwrap();

    assert!(first < second);
}

// ── Merge ────────────────────────────────────────────────────────

#[test]
fn merge_two_empty_sets() {
    let mut s1: ORSet<i32> = ORSet::new(replica(1));
    let mut s2: ORSet<i32> = ORSet::new(replica(2));
    s1.merge(&s2.clone());
    s2.merge(&s1);
    assert_eq!(s1.len(), 0);
    assert_eq!(s2.len(), 0);
}

#[test]
fn merge_into_empty_set_copies_everything() {
    let mut s1 = ORSet::new(replica(1));
    let mut s2 = ORSet::new(replica(2));
    for i in 0..100 {
        s1.add(i);
    }

    s2.merge(&s1);
    assert_eq!(elements(&s2), elements(&s1));
    assert_eq!(s2.len(), 100);
}

#[test]
fn remove_then_merge_propagates_the_remove() {
    let mut s1 = ORSet::new(replica(1));
    let mut s2 = ORSet::new(replica(2));
    for i in 0..100 {
        s1.add(i);
    }
    s2.merge(&s1);

    for i in 0..50 {
        s1.remove(&i);
    }
    s2.merge(&s1);
    assert_eq!(elements(&s1), elements(&s2));
    assert_eq!(s2.len(), 50);
}

#[test]
fn remove_without_having_seen_the_element_is_a_noop() {
    // The removing replica has never observed "x", so nothing is removed and
    // a later merge brings the element in.
    let mut s1 = ORSet::new(replica(1));
    let mut s2 = ORSet::new(replica(2));

    s1.add("x");
    assert!(!s2.remove(&"x"));

    s2.merge(&s1);
    assert!(s2.contains(&"x"));
}

#[test]
fn remove_after_observation_wins() {
    let mut s1 = ORSet::new(replica(1));
    let mut s2 = ORSet::new(replica(2));

    s1.add("x");
    s2.merge(&s1);
    assert!(s2.contains(&"x"));

    s2.remove(&"x");
    s1.merge(&s2);
    assert!(!s1.contains(&"x"));
    assert!(!s2.contains(&"x"));
}

#[test]
fn concurrent_add_wins_over_remove() {
    // s2 observed the element and removed it, but s1 re-added concurrently:
    // the fresh add-stamp is not covered by s2's version vector, so the
    // element survives on both sides.
    let mut s1 = ORSet::new(replica(1));
    let mut s2 = ORSet::new(replica(2));

    s1.add("item");
    s2.merge(&s1);
    s2.remove(&"item");
    s1.add("item");

    s1.merge(&s2);
    assert!(s1.contains(&"item"));

    s2.merge(&s1);
    assert!(s2.contains(&"item"));
}

#[test]
fn removed_element_does_not_bounce_back() {
    // s1 removed the element after observing only its own add; merging with
    // a peer that still holds the old evidence must not resurrect it.
    let mut s1 = ORSet::new(replica(1));
    let mut s2 = ORSet::new(replica(2));

    s1.add("x");
    s2.merge(&s1);
    s1.remove(&"x");

    s1.merge(&s2);
    assert!(!s1.contains(&"x"));

    s2.merge(&s1);
    assert!(!s2.contains(&"x"));
}

#[test]
fn element_reappears_after_concurrent_readd_cycle() {
    // From the reference behavior: s2 repeatedly adds and removes while s1
    // holds an older add it never gave up. Merging back must re-introduce
    // the element at s2, because s1's evidence was never observed there.
    let mut s1 = ORSet::new(replica(1));
    let mut s2 = ORSet::new(replica(2));

    s1.add("b");
    s2.add("b");
    s2.remove(&"b");

    s1.merge(&s2);
    assert!(s1.contains(&"b"));

    s2.add("b");
    s2.remove(&"b");
    assert!(!s2.contains(&"b"));

    s2.merge(&s1);
    assert!(s2.contains(&"b"));
}

#[test]
fn mixed_operations_converge_after_mutual_merge() {
    let mut s1 = ORSet::new(replica(1));
    let mut s2 = ORSet::new(replica(2));

    for i in 0..50 {
        s1.add(i);
    }
    for i in 25..75 {
        s2.add(i);
    }
    for i in 0..10 {
        s1.remove(&i);
    }
    for i in 65..75 {
        s2.remove(&i);
    }

    s1.merge(&s2.clone());
    s2.merge(&s1);
    assert_eq!(elements(&s1), elements(&s2));
    assert_eq!(elements(&s1), (10..65).collect::<HashSet<_>>());
}

// ── Merge properties ─────────────────────────────────────────────

#[test]
fn merge_is_commutative() {
    let mut s1 = ORSet::new(replica(1));
    let mut s2 = ORSet::new(replica(2));
    s1.add(1);
    s1.add(2);
    s2.add(2);
    s2.add(3);

    let m12 = s1.merged(&s2);
    let m21 = s2.merged(&s1);
    assert_eq!(elements(&m12), elements(&m21));
}

#[test]
fn merge_is_idempotent() {
    let mut set = ORSet::new(replica(1));
    set.add(1);
    set.add(2);
    set.remove(&1);

    let snapshot = set.clone();
    set.merge(&snapshot);
    assert_eq!(elements(&set), elements(&snapshot));
    let before: std::collections::HashMap<_, _> =
        snapshot.versions().map(|(r, t)| (*r, *t)).collect();
    let after: std::collections::HashMap<_, _> =
        set.versions().map(|(r, t)| (*r, *t)).collect();
    assert_eq!(before, after);
}

#[test]
fn merge_is_associative() {
    let mut a = ORSet::new(replica(1));
    let mut b = ORSet::new(replica(2));
    let mut c = ORSet::new(replica(3));
    a.add(1);
    b.add(2);
    c.add(3);

    let ab_c = a.merged(&b).merged(&c);
    let a_bc = a.merged(&b.merged(&c));
    assert_eq!(elements(&ab_c), elements(&a_bc));
}

// ── Serde ────────────────────────────────────────────────────────

#[test]
fn serialization_roundtrip() {
    let mut set = ORSet::new(replica(3));
    set.add("a".to_string());
    set.add("b".to_string());
    set.remove(&"a".to_string());

    let json = serde_json::to_string(&set).unwrap();
    let parsed: ORSet<String> = serde_json::from_str(&json).unwrap();
    assert_eq!(elements(&parsed), elements(&set));
    assert_eq!(parsed.replica_id(), replica(3));
}

#[test]
fn deserialized_set_keeps_merging_correctly() {
    // A deserialized replica must carry enough state (evidence + version
    // vector) to make the same merge decisions as the original.
    let mut s1 = ORSet::new(replica(1));
    let mut s2 = ORSet::new(replica(2));
    s1.add("x".to_string());
    s2.merge(&s1);
    s2.remove(&"x".to_string());

    let json = serde_json::to_string(&s2).unwrap();
    let restored: ORSet<String> = serde_json::from_str(&json).unwrap();

    s1.merge(&restored);
    assert!(!s1.contains(&"x".to_string()));
}
