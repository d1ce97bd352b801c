use std::num::NonZeroUsize;

use lrumap::LruCache;

fn main() {
    let mut cache = LruCache::<i32, i32>::new(NonZeroUsize::new(300000).unwrap());
    for _ in 0..300 {
        for i in 0..100000 {
            cache.save(i, i);
        }
        for i in 0..100000 {
            std::hint::black_box(cache.get(std::hint::black_box(&i)));
        }
        for i in 0..100000 {
            std::hint::black_box(cache.remove(std::hint::black_box(&i)));
        }
    }
    std::hint::black_box(cache);
}
