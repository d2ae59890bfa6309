//! Benchmarks for core cache operations
//!
//! Measures set/get latency and the cache-aside helper against the memory
//! tier, so the suite runs without external infrastructure.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dual_tier_cache::{CacheService, Ttl};
use serde_json::json;
use std::time::Duration;
use tokio::runtime::Runtime;

fn setup_cache() -> (CacheService, Runtime) {
    let rt = Runtime::new().unwrap_or_else(|_| panic!("Failed to create runtime"));
    let cache = CacheService::memory_only();
    (cache, rt)
}

/// Generate test data of specified size
fn test_data(size_bytes: usize) -> serde_json::Value {
    let data_string = "x".repeat(size_bytes);
    json!({
        "data": data_string,
        "size": size_bytes,
    })
}

fn bench_set(c: &mut Criterion) {
    let (cache, rt) = setup_cache();

    let mut group = c.benchmark_group("set");
    group.measurement_time(Duration::from_secs(5));

    for size in &[100, 1024, 10_240] {
        let data = test_data(*size);

        group.bench_with_input(BenchmarkId::new("memory", size), size, |b, _| {
            b.iter(|| {
                rt.block_on(async {
                    let key = format!("bench:set:{}", rand::random::<u32>());
                    cache.set(&key, black_box(&data), Ttl::Short).await;
                });
            });
        });
    }

    group.finish();
}

fn bench_get_hit(c: &mut Criterion) {
    let (cache, rt) = setup_cache();
    let data = test_data(1024);

    rt.block_on(async {
        cache.set("bench:hit", &data, Ttl::Long).await;
    });

    c.bench_function("get_hit", |b| {
        b.iter(|| {
            rt.block_on(async {
                let value: Option<serde_json::Value> = cache.get(black_box("bench:hit")).await;
                black_box(value)
            })
        });
    });
}

fn bench_get_miss(c: &mut Criterion) {
    let (cache, rt) = setup_cache();

    c.bench_function("get_miss", |b| {
        b.iter(|| {
            rt.block_on(async {
                let value: Option<serde_json::Value> = cache.get(black_box("bench:absent")).await;
                black_box(value)
            })
        });
    });
}

fn bench_get_or_set_warm(c: &mut Criterion) {
    let (cache, rt) = setup_cache();
    let data = test_data(1024);

    rt.block_on(async {
        cache.set("bench:warm", &data, Ttl::Long).await;
    });

    c.bench_function("get_or_set_warm", |b| {
        b.iter(|| {
            rt.block_on(async {
                let value: serde_json::Value = cache
                    .get_or_set("bench:warm", Ttl::Long, || async {
                        panic!("warm key must not recompute")
                    })
                    .await
                    .unwrap_or_else(|_| panic!("cache-aside failed"));
                black_box(value)
            })
        });
    });
}

criterion_group!(
    benches,
    bench_set,
    bench_get_hit,
    bench_get_miss,
    bench_get_or_set_warm
);
criterion_main!(benches);
