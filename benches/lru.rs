use std::num::NonZeroUsize;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use evictkit::policy::lru::{LruCache, LruCore};
use evictkit::traits::{CoreCache, LruCacheTrait};

fn filled_core(capacity: usize) -> LruCore<u64, u64> {
    let mut cache = LruCore::new(NonZeroUsize::new(capacity).unwrap());
    for i in 0..capacity as u64 {
        cache.insert(i, i);
    }
    cache
}

fn bench_lru_insert_get(c: &mut Criterion) {
    c.bench_function("lru_insert_get", |b| {
        b.iter_batched(
            || filled_core(1024),
            |mut cache| {
                for i in 0..1024u64 {
                    cache.insert(std::hint::black_box(i + 10_000), i);
                    let _ = std::hint::black_box(cache.get(&std::hint::black_box(i)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_pop_lru(c: &mut Criterion) {
    c.bench_function("lru_pop_lru", |b| {
        b.iter_batched(
            || filled_core(1024),
            |mut cache| {
                for _ in 0..1024u64 {
                    let _ = std::hint::black_box(cache.pop_lru());
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_eviction_churn(c: &mut Criterion) {
    c.bench_function("lru_eviction_churn", |b| {
        b.iter_batched(
            || filled_core(1024),
            |mut cache| {
                for i in 0..4096u64 {
                    cache.insert(std::hint::black_box(10_000 + i), i);
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_touch_hotset(c: &mut Criterion) {
    c.bench_function("lru_touch_hotset", |b| {
        b.iter_batched(
            || filled_core(4096),
            |mut cache| {
                for i in 0..4096u64 {
                    let _ = std::hint::black_box(cache.touch(&std::hint::black_box(i)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_lru_concurrent_get_hit(c: &mut Criterion) {
    let cache: LruCache<u64, u64> = LruCache::try_new(4096).unwrap();
    for i in 0..4096u64 {
        cache.put(i, i);
    }
    c.bench_function("lru_concurrent_get_hit", |b| {
        let mut i = 0u64;
        b.iter(|| {
            i = (i + 1) & 4095;
            std::hint::black_box(cache.get(&std::hint::black_box(i)))
        })
    });
}

criterion_group!(
    benches,
    bench_lru_insert_get,
    bench_lru_pop_lru,
    bench_lru_eviction_churn,
    bench_lru_touch_hotset,
    bench_lru_concurrent_get_hit
);
criterion_main!(benches);
