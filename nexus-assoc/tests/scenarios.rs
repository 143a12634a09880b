use nexus_assoc::{
    Error, HashedMap, HashedMultiSet, HashedSet, List, OrderedMap, OrderedMultiMap,
    OrderedMultiSet, OrderedSet,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn hash_invariant_holds<K: std::hash::Hash + Eq>(set: &HashedSet<K>) -> bool {
    let total: usize = (0..set.bucket_count())
        .map(|i| set.bucket_size(i).unwrap())
        .sum();
    total == set.len()
        && set
            .iter()
            .all(|k| set.bucket_iter(set.bucket(k)).unwrap().any(|other| other == k))
}

// =============================================================================
// Ordered - unique
// =============================================================================

#[test]
fn ordered_unique_sorts_inserts() {
    let mut set: OrderedSet<u32> = OrderedSet::new();
    for v in [5, 3, 8, 1, 4] {
        set.insert(v);
    }
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 3, 4, 5, 8]);
}

#[test]
fn ordered_unique_reinsert_is_rejected() {
    let mut map: OrderedMap<&str, u32> = OrderedMap::new();
    let (first, inserted) = map.insert(("k", 1));
    assert!(inserted);

    let (again, inserted) = map.insert(("k", 2));
    assert!(!inserted);
    assert!(again.equals(&first).unwrap());
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&"k"), Some(&1));
}

#[test]
fn ordered_iteration_non_decreasing_under_random_ops() {
    let mut rng = SmallRng::seed_from_u64(42);
    let mut set: OrderedMultiSet<i32> = OrderedMultiSet::new();

    for _ in 0..2000 {
        let v = rng.gen_range(-100..100);
        if rng.gen_bool(0.7) {
            set.insert(v);
        } else {
            set.erase_key(&v);
        }
        let values: Vec<i32> = set.iter().copied().collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(values.len(), set.len());
    }
}

// =============================================================================
// Ordered - multi
// =============================================================================

#[test]
fn ordered_multi_equal_range_is_contiguous() {
    let mut set: OrderedMultiSet<&str> = OrderedMultiSet::new();
    for k in ["a", "b", "a", "c", "a", "a"] {
        set.insert(k);
    }
    assert_eq!(set.count(&"a"), 4);

    let (mut c, last) = set.equal_range(&"a");
    let mut run = 0;
    while !c.equals(&last).unwrap() {
        assert_eq!(set.value(&c), Ok(&"a"));
        run += 1;
        c = set.next(&c).unwrap();
    }
    assert_eq!(run, 4);
    assert_eq!(set.value(&last), Ok(&"b"));

    let before = set.begin();
    assert_eq!(set.value(&before), Ok(&"a"));
}

#[test]
fn ordered_multi_count_grows_by_one_per_insert() {
    let mut map: OrderedMultiMap<u8, u32> = OrderedMultiMap::new();
    map.insert((1, 0));
    for n in 1..=10 {
        map.insert((7, n));
        assert_eq!(map.count(&7), n as usize);
    }
    assert_eq!(map.count(&1), 1);
}

// =============================================================================
// Hashed
// =============================================================================

#[test]
fn hashed_grows_past_load_factor() {
    let mut set: HashedSet<u64> = HashedSet::new();
    set.set_max_load_factor(1.0).unwrap();
    set.insert_iter([11, 22, 33]);
    let before = set.bucket_count();

    set.insert(44);
    assert!(set.bucket_count() > before);
    for k in [11, 22, 33, 44] {
        assert_eq!(set.value(&set.find(&k)), Ok(&k));
    }
    assert!(hash_invariant_holds(&set));
}

#[test]
fn hashed_invariant_under_random_ops() {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut set: HashedSet<u32> = HashedSet::new();

    for step in 0..3000 {
        let v = rng.gen_range(0..300);
        if rng.gen_bool(0.6) {
            set.insert(v);
        } else {
            let c = set.find(&v);
            if !c.is_end() {
                set.erase(&c).unwrap();
            }
        }
        if step % 100 == 0 {
            assert!(hash_invariant_holds(&set));
        }
    }
    assert!(hash_invariant_holds(&set));
}

#[test]
fn hashed_unique_reinsert_is_rejected() {
    let mut map: HashedMap<String, u32> = HashedMap::new();
    assert!(map.insert(("x".into(), 1)).1);
    assert!(!map.insert(("x".into(), 2)).1);
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&"x".to_string()), Some(&1));
}

#[test]
fn hashed_multi_counts_every_insert() {
    let mut set: HashedMultiSet<char> = HashedMultiSet::new();
    set.insert('z');
    for n in 1..=5 {
        set.insert('q');
        assert_eq!(set.count(&'q'), n);
    }
    assert_eq!(set.erase_key(&'q'), 5);
    assert_eq!(set.len(), 1);
}

// =============================================================================
// Cursors
// =============================================================================

#[test]
fn erase_middle_of_five() {
    let mut set: OrderedSet<u32> = (10..15).collect();
    let mid = set.find(&12);
    let next = set.erase(&mid).unwrap();
    assert_eq!(set.value(&next), Ok(&13));
    assert_eq!(set.len(), 4);

    let mut list: List<u32> = (10..15).collect();
    let mut mid = list.begin();
    for _ in 0..2 {
        mid = list.next(&mid).unwrap();
    }
    let next = list.erase(&mid).unwrap();
    assert_eq!(list.value(&next), Ok(&13));
    assert_eq!(list.len(), 4);
}

#[test]
fn cursors_survive_unrelated_changes() {
    let mut set: HashedSet<u32> = (0..20).collect();
    let kept: Vec<_> = [3, 9, 15].iter().map(|k| set.find(k)).collect();

    for v in 20..200 {
        set.insert(v);
    }
    for v in (0..20).filter(|v| v % 3 != 0) {
        set.erase_key(&v);
    }

    for (c, k) in kept.iter().zip([3, 9, 15]) {
        assert_eq!(set.value(c), Ok(&k));
    }
}

#[test]
fn dereferencing_end_is_out_of_range() {
    let set: OrderedSet<u32> = OrderedSet::new();
    let err = set.value(&set.end()).unwrap_err();
    assert_eq!(err, Error::OutOfRange);
    assert!(err.is_out_of_range());
}

#[test]
fn cross_container_cursor_is_invalid_argument() {
    let mut a: OrderedSet<u32> = (0..3).collect();
    let b: OrderedSet<u32> = (0..3).collect();

    let foreign = b.begin();
    let err = a.erase(&foreign).unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(a.len(), 3);

    assert_eq!(a.begin().equals(&foreign), Err(Error::ForeignCursor));
}

#[test]
fn swap_moves_cursor_identity() {
    let mut a: HashedSet<u32> = [1, 2].into_iter().collect();
    let mut b: HashedSet<u32> = [3].into_iter().collect();
    let in_a = a.find(&2);

    a.swap(&mut b);
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 2);
    assert_eq!(b.value(&in_a), Ok(&2));
    assert_eq!(a.value(&in_a), Err(Error::ForeignCursor));
}
