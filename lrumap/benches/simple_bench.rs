use std::{
    hint::black_box,
    num::NonZeroUsize,
};

use criterion::{
    BenchmarkId,
    Criterion,
    criterion_group,
    criterion_main,
};
use lrumap::{
    LinkedHashMap,
    LruCache,
};

const ENTRIES: usize = 10000;

fn filled(capacity: usize) -> LruCache<usize, usize> {
    let mut cache = LruCache::new(NonZeroUsize::new(capacity).unwrap());
    for i in 0..capacity {
        cache.save(i, i);
    }
    cache
}

fn bench_save_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("lru_save_update");
    group.bench_function(BenchmarkId::from_parameter(ENTRIES), |b| {
        let mut cache = filled(ENTRIES);
        b.iter(|| {
            for i in 0..ENTRIES {
                cache.save(black_box(i), i);
            }
        });
    });
    group.finish();
}

fn bench_save_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("lru_save_insert");
    group.bench_function(BenchmarkId::from_parameter(ENTRIES), |b| {
        b.iter(|| {
            let mut cache = LruCache::new(NonZeroUsize::new(ENTRIES).unwrap());
            for i in 0..ENTRIES {
                cache.save(black_box(i), i);
            }
            cache
        });
    });
    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("lru_get");
    group.bench_function(BenchmarkId::from_parameter(ENTRIES), |b| {
        let mut cache = filled(ENTRIES);
        b.iter(|| {
            for i in 0..ENTRIES {
                black_box(cache.get(&i));
            }
        });
    });
    group.finish();
}

fn bench_get_not_found(c: &mut Criterion) {
    let mut group = c.benchmark_group("lru_get_not_found");
    group.bench_function(BenchmarkId::from_parameter(ENTRIES), |b| {
        let mut cache = filled(ENTRIES);
        b.iter(|| {
            for i in ENTRIES..2 * ENTRIES {
                black_box(cache.get(&i));
            }
        });
    });
    group.finish();
}

fn bench_peek(c: &mut Criterion) {
    let mut group = c.benchmark_group("lru_peek");
    group.bench_function(BenchmarkId::from_parameter(ENTRIES), |b| {
        let cache = filled(ENTRIES);
        b.iter(|| {
            for i in 0..ENTRIES {
                black_box(cache.peek(&i));
            }
        });
    });
    group.finish();
}

fn bench_evict(c: &mut Criterion) {
    let mut group = c.benchmark_group("lru_evict");
    group.bench_function(BenchmarkId::from_parameter(ENTRIES), |b| {
        let mut cache = filled(ENTRIES);
        let mut next = ENTRIES;
        b.iter(|| {
            for _ in 0..ENTRIES {
                cache.save(black_box(next), next);
                next += 1;
            }
        });
    });
    group.finish();
}

fn bench_table_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("linked_hash_map_growth");
    group.bench_function(BenchmarkId::from_parameter(ENTRIES), |b| {
        b.iter(|| {
            let mut map = LinkedHashMap::with_buckets(1);
            for i in 0..ENTRIES {
                map.insert(black_box(i), i);
            }
            map
        });
    });
    group.finish();
}

criterion_group!(
    lru,
    bench_save_update,
    bench_save_insert,
    bench_get,
    bench_get_not_found,
    bench_peek,
    bench_evict,
);
criterion_group!(linked, bench_table_growth);
criterion_main!(lru, linked);
