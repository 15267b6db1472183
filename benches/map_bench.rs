use anchor_hashmap::AnchorHashMap;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn prefilled(seed: u64, n: usize) -> (AnchorHashMap<String, u64>, Vec<String>) {
    let mut m = AnchorHashMap::with_buckets(1024);
    let keys: Vec<String> = lcg(seed).take(n).map(key).collect();
    for (i, k) in keys.iter().enumerate() {
        assert!(m.insert(k.clone(), i as u64));
    }
    (m, keys)
}

fn bench_insert_fresh_100k(c: &mut Criterion) {
    c.bench_function("anchor::insert_fresh_100k", |b| {
        b.iter_batched(
            || AnchorHashMap::<String, u64>::with_buckets(1024),
            |mut m| {
                for (i, x) in lcg(1).take(100_000).enumerate() {
                    assert!(m.insert(key(x), i as u64));
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_growing_from_one_bucket(c: &mut Criterion) {
    c.bench_function("anchor::insert_growing_10k", |b| {
        b.iter_batched(
            AnchorHashMap::<String, u64>::new,
            |mut m| {
                for (i, x) in lcg(2).take(10_000).enumerate() {
                    assert!(m.insert(key(x), i as u64));
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_find_hit_10k(c: &mut Criterion) {
    c.bench_function("anchor::find_hit_10k_on_100k", |b| {
        let (m, keys) = prefilled(7, 100_000);
        // Precompute 10k random query keys using the LCG.
        let n = keys.len();
        let mut s = 0x9e3779b97f4a7c15u64;
        let queries: Vec<String> = (0..10_000)
            .map(|_| {
                s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                keys[(s as usize) % n].clone()
            })
            .collect();
        b.iter(|| {
            for k in &queries {
                black_box(m.find(k.as_str()));
            }
        })
    });
}

fn bench_find_miss_10k(c: &mut Criterion) {
    c.bench_function("anchor::find_miss_10k_on_100k", |b| {
        let (m, _keys) = prefilled(11, 100_000);
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            for _ in 0..10_000 {
                let k = key(miss.next().unwrap());
                black_box(m.find(k.as_str()));
            }
        })
    });
}

fn bench_remove_reinsert_10k(c: &mut Criterion) {
    c.bench_function("anchor::remove_10k_of_100k", |b| {
        b.iter_batched(
            || {
                let (m, keys) = prefilled(13, 100_000);
                let n = keys.len();
                let mut s = 0x9e3779b97f4a7c15u64;
                let mut sel = std::collections::HashSet::with_capacity(10_000);
                while sel.len() < 10_000 {
                    s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                    sel.insert((s as usize) % n);
                }
                let to_remove: Vec<String> = sel.into_iter().map(|i| keys[i].clone()).collect();
                (m, to_remove)
            },
            |(mut m, to_remove)| {
                for k in &to_remove {
                    assert!(m.remove(k.as_str()));
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_iter_all_100k(c: &mut Criterion) {
    c.bench_function("anchor::iter_all_100k", |b| {
        let (m, _keys) = prefilled(999, 100_000);
        b.iter(|| {
            let mut sum = 0u64;
            for (_k, v) in m.iter() {
                sum = sum.wrapping_add(*v);
            }
            black_box(sum)
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(12)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches_insert;
    config = bench_config();
    targets = bench_insert_fresh_100k, bench_insert_growing_from_one_bucket
}
criterion_group! {
    name = benches_ops;
    config = bench_config();
    targets = bench_find_hit_10k,
              bench_find_miss_10k,
              bench_remove_reinsert_10k,
              bench_iter_all_100k
}
criterion_main!(benches_insert, benches_ops);
