use std::hash::{
    BuildHasher,
    Hasher,
};

use lrumap::{
    BucketedMap,
    DualList,
    Error,
    LinkedHashMap,
    Ptr,
};

#[test]
fn test_linked_hash_map_survives_repeated_doubling() {
    let mut map = LinkedHashMap::with_buckets(4);
    let initial = map.bucket_count();
    for i in 0..64u32 {
        map.insert(i, i * 3);
    }
    assert!(map.bucket_count() >= initial * 4);

    for i in 0..64u32 {
        assert_eq!(map.get(&i), Some(&(i * 3)));
        let pos = map.find(&i);
        assert_ne!(pos, map.end());
        assert_eq!(map.entry_at(pos), Ok((&i, &(i * 3))));
    }
    assert_eq!(
        map.keys().copied().collect::<Vec<_>>(),
        (0..64).collect::<Vec<_>>()
    );

    for i in 0..64u32 {
        assert_eq!(map.remove(map.find(&i)), Ok((i, i * 3)));
    }
    assert!(map.is_empty());
    assert_eq!(map.begin(), map.end());
}

#[test]
fn test_linked_hash_map_rewrite_moves_to_back() {
    let mut map: LinkedHashMap<&str, i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
    let (pos, inserted) = map.insert("a", 4);
    assert!(!inserted);
    assert_eq!(map.prev_pos(map.end()), Ok(pos));
    assert_eq!(map.front(), Some((&"b", &2)));
    assert_eq!(map.back(), Some((&"a", &4)));
    assert_eq!(map.len(), 3);
}

#[test]
fn test_linked_hash_map_positional_errors() {
    let mut map: LinkedHashMap<i32, i32> = LinkedHashMap::new();
    let end = map.end();
    assert_eq!(map.next_pos(end), Err(Error::InvalidPosition(end)));
    assert_eq!(map.prev_pos(end), Err(Error::InvalidPosition(end)));
    assert_eq!(map.remove(end), Err(Error::InvalidPosition(end)));
    assert_eq!(map.at(&1), Err(Error::MissingKey));

    let (pos, _) = map.insert(1, 1);
    map.remove(pos).unwrap();
    assert_eq!(map.entry_at(pos), Err(Error::InvalidPosition(pos)));
}

#[test]
fn test_linked_hash_map_entry_at_mut() {
    let mut map = LinkedHashMap::new();
    map.insert('x', String::from("x"));
    let pos = map.begin();
    map.entry_at_mut(pos).unwrap().1.push('!');
    assert_eq!(map[&'x'], "x!");
}

#[test]
fn test_linked_hash_map_clone_matches_source() {
    let mut map = LinkedHashMap::new();
    for i in 0..40 {
        map.insert(i % 13, i);
    }
    let copy = map.clone();
    assert_eq!(copy.len(), map.len());
    assert!(copy.iter().eq(map.iter()));
    for (key, value) in &map {
        assert_ne!(copy.find(key), copy.end());
        assert_eq!(copy.get(key), Some(value));
    }
}

#[test]
fn test_linked_hash_map_with_hasher() {
    #[derive(Clone, Default)]
    struct Fnv;

    struct FnvHasher(u64);

    impl Hasher for FnvHasher {
        fn finish(&self) -> u64 {
            self.0
        }

        fn write(&mut self, bytes: &[u8]) {
            for byte in bytes {
                self.0 ^= u64::from(*byte);
                self.0 = self.0.wrapping_mul(0x100000001b3);
            }
        }
    }

    impl BuildHasher for Fnv {
        type Hasher = FnvHasher;

        fn build_hasher(&self) -> FnvHasher {
            FnvHasher(0xcbf29ce484222325)
        }
    }

    let mut map = LinkedHashMap::with_hasher(Fnv);
    map.extend((0..100).map(|i| (i, i)));
    assert_eq!(map.len(), 100);
    assert_eq!(map.count(&99), 1);
    assert_eq!(map.remove_key(&50), Some((50, 50)));
    assert_eq!(map.count(&50), 0);
}

#[test]
fn test_bucketed_map_growth_keeps_positions() {
    let mut map = BucketedMap::with_buckets(1);
    let ptrs: Vec<Ptr> = (0..50).map(|i| map.insert(i, i).0).collect();
    assert_eq!(map.bucket_count(), 128);
    for (i, ptr) in ptrs.into_iter().enumerate() {
        assert_eq!(map.find(&i), Some(ptr));
        assert_eq!(map.entry(ptr), Some((&i, &i)));
    }
}

#[test]
fn test_dual_list_end_marker() {
    let mut list = DualList::new();
    let a = list.insert_tail('a');
    let b = list.insert_tail('b');
    assert_eq!(list.next_pos(b), Ok(list.end()));
    assert_eq!(list.prev_pos(a), Ok(list.end()));
    assert_eq!(list.prev_pos(list.end()), Ok(b));
    assert_eq!(list.get(list.end()), Err(Error::InvalidPosition(Ptr::null())));
}
