use std::num::NonZeroUsize;

use lrumap::{
    Error,
    LruCache,
};

fn cache<K, V>(capacity: usize) -> LruCache<K, V> {
    LruCache::new(NonZeroUsize::new(capacity).unwrap())
}

#[test]
fn test_lru_new_empty() {
    let cache = cache::<i32, String>(3);
    assert_eq!(cache.len(), 0);
    assert!(cache.is_empty());
    assert_eq!(cache.capacity(), 3);
    assert_eq!(cache.into_iter().collect::<Vec<_>>(), vec![]);
}

#[test]
fn test_lru_try_new_zero() {
    assert_eq!(
        LruCache::<i32, i32>::try_new(0).err(),
        Some(Error::InvalidCapacity)
    );
    assert_eq!(
        LruCache::<i32, i32>::try_new(0).err().map(|e| e.to_string()),
        Some("cache capacity must be greater than zero".to_string())
    );
}

#[test]
fn test_lru_save_multiple_keeps_order() {
    let mut cache = cache(3);
    cache.save(1, "one".to_string());
    cache.save(2, "two".to_string());
    cache.save(3, "three".to_string());
    assert_eq!(cache.len(), 3);
    assert_eq!(
        cache.into_iter().collect::<Vec<_>>(),
        vec![
            (1, "one".to_string()),
            (2, "two".to_string()),
            (3, "three".to_string())
        ]
    );
}

#[test]
fn test_lru_size_bound_holds_after_every_save() {
    let mut cache = cache(5);
    for i in 0..100 {
        cache.save(i % 17, i);
        assert!(cache.len() <= cache.capacity());
    }
    assert_eq!(cache.len(), 5);
}

#[test]
fn test_lru_overflow_evicts_first_key() {
    let mut cache = cache(4);
    for i in 0..5 {
        cache.save(i, i * 100);
    }
    assert_eq!(cache.len(), 4);
    assert!(!cache.contains_key(&0));
    assert_eq!(cache.keys().copied().collect::<Vec<_>>(), [1, 2, 3, 4]);
}

#[test]
fn test_lru_hit_protects_from_eviction() {
    let mut cache = cache(4);
    for i in 1..=4 {
        cache.save(i, i);
    }
    assert_eq!(cache.get(&1), Some(&1));
    cache.save(5, 5);
    assert!(cache.contains_key(&1));
    assert!(!cache.contains_key(&2));
    assert_eq!(cache.keys().copied().collect::<Vec<_>>(), [3, 4, 1, 5]);
}

#[test]
fn test_lru_update_existing() {
    let mut cache = cache(3);
    cache.save("a", 1);
    cache.save("b", 2);
    cache.save("c", 3);
    cache.save("a", 10);
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.get(&"a"), Some(&10));
    assert_eq!(
        cache.into_iter().collect::<Vec<_>>(),
        vec![("b", 2), ("c", 3), ("a", 10)]
    );
}

#[test]
fn test_lru_round_trip() {
    let mut cache = cache(8);
    cache.save("present".to_string(), 42);
    assert_eq!(cache.get("present"), Some(&42));
    assert_eq!(cache.get("absent"), None);
    assert_eq!(cache.peek("absent"), None);
}

#[test]
fn test_lru_capacity_two_scenario() {
    let mut cache = cache(2);
    cache.save(1, 'A');
    cache.save(2, 'B');
    assert_eq!(cache.get(&1), Some(&'A'));
    cache.save(3, 'C');
    assert_eq!(
        cache.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(),
        [(1, 'A'), (3, 'C')]
    );
    assert_eq!(cache.get(&2), None);
}

#[test]
fn test_lru_get_nonexistent() {
    let mut cache = cache(3);
    cache.save(1, "one".to_string());
    assert_eq!(cache.get(&2), None);
    assert_eq!(
        cache.into_iter().collect::<Vec<_>>(),
        vec![(1, "one".to_string())]
    );
}

#[test]
fn test_lru_get_mut() {
    let mut cache = cache(3);
    cache.save(1, vec![1]);
    cache.save(2, vec![2]);
    cache.get_mut(&1).unwrap().push(10);
    assert_eq!(cache.tail(), Some((&2, &vec![2])));
    assert_eq!(cache.peek(&1), Some(&vec![1, 10]));
}

#[test]
fn test_lru_peek() {
    let mut cache = cache(3);
    cache.save(1, "one");
    cache.save(2, "two");
    let before: Vec<_> = cache.keys().copied().collect();
    assert_eq!(cache.peek(&1), Some(&"one"));
    assert_eq!(cache.keys().copied().collect::<Vec<_>>(), before);
}

#[test]
fn test_lru_remove() {
    let mut cache = cache(3);
    cache.save(1, "one");
    cache.save(2, "two");
    assert_eq!(cache.remove(&1), Some("one"));
    assert_eq!(cache.remove(&1), None);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.tail(), Some((&2, &"two")));
}

#[test]
fn test_lru_pop_and_tail() {
    let mut cache = cache(3);
    assert_eq!(cache.tail(), None);
    assert_eq!(cache.pop(), None);

    cache.extend([(1, 'a'), (2, 'b'), (3, 'c')]);
    cache.get(&1);
    assert_eq!(cache.tail(), Some((&2, &'b')));
    assert_eq!(cache.pop(), Some((2, 'b')));
    assert_eq!(cache.pop(), Some((3, 'c')));
    assert_eq!(cache.pop(), Some((1, 'a')));
    assert!(cache.is_empty());
}

#[test]
fn test_lru_clear() {
    let mut cache = cache(3);
    cache.extend([(1, 1), (2, 2), (3, 3)]);
    cache.clear();
    assert!(cache.is_empty());
    cache.save(4, 4);
    assert_eq!(cache.into_iter().collect::<Vec<_>>(), vec![(4, 4)]);
}

#[test]
fn test_lru_set_capacity_shrinks_from_lru_end() {
    let mut cache = cache(4);
    cache.extend([(1, 1), (2, 2), (3, 3), (4, 4)]);
    cache.get(&1);
    cache.set_capacity(NonZeroUsize::new(2).unwrap());
    assert_eq!(cache.keys().copied().collect::<Vec<_>>(), [4, 1]);
}

#[test]
fn test_lru_extend_evicts() {
    let mut cache = cache(2);
    cache.extend((0..10).map(|i| (i, i.to_string())));
    assert_eq!(
        cache.into_iter().collect::<Vec<_>>(),
        vec![(8, "8".to_string()), (9, "9".to_string())]
    );
}

#[test]
fn test_lru_iter_rev_is_most_recent_first() {
    let mut cache = cache(3);
    cache.extend([(1, ()), (2, ()), (3, ())]);
    cache.get(&2);
    assert_eq!(
        cache.iter().rev().map(|(k, _)| *k).collect::<Vec<_>>(),
        [2, 3, 1]
    );
    assert_eq!(cache.values().len(), 3);
}

#[test]
fn test_lru_raised_capacity_grows_table() {
    // Sized for 2 entries (7 buckets), so 2000 entries force several doublings.
    let mut cache = cache(2);
    cache.set_capacity(NonZeroUsize::new(2000).unwrap());
    for i in 0..2000u32 {
        cache.save(i, i);
    }
    for i in 0..2000u32 {
        assert_eq!(cache.get(&i), Some(&i));
    }
    for i in (0..2000u32).step_by(3) {
        assert_eq!(cache.remove(&i), Some(i));
    }
    assert_eq!(cache.len(), 2000 - 667);
}

#[test]
fn test_lru_values_need_no_traits() {
    struct Opaque(u8);

    let mut cache = cache(1);
    cache.save("k", Opaque(1));
    cache.save("k", Opaque(2));
    assert_eq!(cache.get(&"k").map(|v| v.0), Some(2));
}

#[test]
fn test_lru_write_contents() {
    let mut cache = cache(3);
    cache.save(1, "A");
    cache.save(2, "B");
    cache.save(3, "C");
    cache.get(&2);

    let mut out = Vec::new();
    cache.write_contents(&mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "1 A\n3 C\n2 B\n");
}

#[cfg(feature = "ahash")]
#[test]
fn test_lru_with_ahash_hasher() {
    let mut cache: LruCache<i32, i32, ahash::RandomState> =
        LruCache::with_hasher(NonZeroUsize::new(2).unwrap(), ahash::RandomState::new());
    cache.save(1, 1);
    cache.save(2, 2);
    cache.save(3, 3);
    assert_eq!(cache.keys().copied().collect::<Vec<_>>(), [2, 3]);
}
