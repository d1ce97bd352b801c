#![no_main]

use std::{
    collections::VecDeque,
    num::NonZeroUsize,
};

use fuzz_lib::CacheOperation;
use libfuzzer_sys::fuzz_target;
use lrumap::LruCache;

/// Reference model: entries ordered least recently used first.
struct Model {
    entries: VecDeque<(u8, u8)>,
    capacity: usize,
}

impl Model {
    fn position(&self, key: u8) -> Option<usize> {
        self.entries.iter().position(|(k, _)| *k == key)
    }

    fn touch(&mut self, key: u8) -> Option<u8> {
        let index = self.position(key)?;
        let entry = self.entries.remove(index)?;
        self.entries.push_back(entry);
        Some(entry.1)
    }

    fn save(&mut self, key: u8, value: u8) {
        if let Some(index) = self.position(key) {
            self.entries.remove(index);
        }
        self.entries.push_back((key, value));
        self.shrink();
    }

    fn shrink(&mut self) {
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }
}

fuzz_target!(|data: (u8, Vec<CacheOperation>)| {
    let (capacity_raw, operations) = data;

    let capacity = NonZeroUsize::new((capacity_raw % 8).max(1) as usize).unwrap();
    let mut cache = LruCache::<u8, u8>::new(capacity);
    let mut model = Model {
        entries: VecDeque::new(),
        capacity: capacity.get(),
    };

    for op in operations {
        match op {
            CacheOperation::Save(key, value) => {
                cache.save(key, value);
                model.save(key, value);
            }
            CacheOperation::Get(key) => {
                assert_eq!(cache.get(&key).copied(), model.touch(key));
            }
            CacheOperation::GetMut(key, value) => {
                let expected = model.touch(key);
                match cache.get_mut(&key) {
                    Some(slot) => {
                        assert_eq!(Some(*slot), expected);
                        *slot = value;
                        if let Some(entry) = model.entries.back_mut() {
                            entry.1 = value;
                        }
                    }
                    None => assert_eq!(expected, None),
                }
            }
            CacheOperation::Peek(key) => {
                let expected = model.position(key).map(|index| model.entries[index].1);
                assert_eq!(cache.peek(&key).copied(), expected);
            }
            CacheOperation::Remove(key) => {
                let expected = model
                    .position(key)
                    .and_then(|index| model.entries.remove(index))
                    .map(|(_, value)| value);
                assert_eq!(cache.remove(&key), expected);
            }
            CacheOperation::Pop => {
                assert_eq!(cache.pop(), model.entries.pop_front());
            }
            CacheOperation::Clear => {
                cache.clear();
                model.entries.clear();
            }
            CacheOperation::SetCapacity(raw) => {
                let capacity = NonZeroUsize::new((raw % 8).max(1) as usize).unwrap();
                cache.set_capacity(capacity);
                model.capacity = capacity.get();
                model.shrink();
            }
            CacheOperation::Iter => {
                let forward: Vec<_> = cache.iter().map(|(k, v)| (*k, *v)).collect();
                let mut backward: Vec<_> = cache.iter().rev().map(|(k, v)| (*k, *v)).collect();
                backward.reverse();
                assert_eq!(forward, backward);
            }
            CacheOperation::Clone => {
                cache = cache.clone();
            }
        }

        cache.debug_validate();
        assert!(cache.len() <= cache.capacity());
        assert_eq!(cache.capacity(), model.capacity);
        assert_eq!(cache.is_empty(), model.entries.is_empty());
        assert_eq!(
            cache.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(),
            model.entries.iter().copied().collect::<Vec<_>>()
        );
        assert_eq!(cache.tail().map(|(k, v)| (*k, *v)), model.entries.front().copied());
    }
});
