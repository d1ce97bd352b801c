#![no_main]

use fuzz_lib::MapOperation;
use libfuzzer_sys::fuzz_target;
use lrumap::LinkedHashMap;

fuzz_target!(|data: (u8, Vec<MapOperation>)| {
    let (buckets, operations) = data;

    // Few buckets so that growth happens early and often.
    let mut map = LinkedHashMap::<u8, u8>::with_buckets((buckets % 4) as usize);
    let mut model: Vec<(u8, u8)> = Vec::new();

    for op in operations {
        match op {
            MapOperation::Insert(key, value) => {
                let existed = model.iter().position(|(k, _)| *k == key);
                if let Some(index) = existed {
                    model.remove(index);
                }
                model.push((key, value));

                let (pos, inserted) = map.insert(key, value);
                assert_eq!(inserted, existed.is_none());
                assert_eq!(map.prev_pos(map.end()), Ok(pos));
                assert_eq!(map.find(&key), pos);
            }
            MapOperation::RemoveKey(key) => {
                let expected = model
                    .iter()
                    .position(|(k, _)| *k == key)
                    .map(|index| model.remove(index));
                assert_eq!(map.remove_key(&key), expected);
                assert_eq!(map.find(&key), map.end());
            }
            MapOperation::RemoveAt(offset) => {
                let mut pos = map.begin();
                for _ in 0..offset as usize % (model.len() + 1) {
                    pos = map.next_pos(pos).unwrap();
                }
                match map.remove(pos) {
                    Ok(pair) => {
                        let index = offset as usize % (model.len() + 1);
                        assert_eq!(model.remove(index), pair);
                    }
                    Err(err) => {
                        assert_eq!(err, lrumap::Error::InvalidPosition(pos));
                        assert_eq!(pos, map.end());
                    }
                }
            }
            MapOperation::PopFront => {
                let expected = (!model.is_empty()).then(|| model.remove(0));
                assert_eq!(map.pop_front(), expected);
            }
            MapOperation::PopBack => {
                assert_eq!(map.pop_back(), model.pop());
            }
            MapOperation::Clear => {
                map.clear();
                model.clear();
            }
        }

        map.debug_validate();
        assert_eq!(map.len(), model.len());
        assert_eq!(
            map.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(),
            model
        );
    }
});
