//! Benchmarks for the at-or-before visibility query
//!
//! Measures the cost of serving one race read over a full-size timeline:
//! - 40 boats sampled every 30 minutes for 80 days (~150k observations)
//! - equivalent-time computation alone
//! - at-or-before query at several points of the replay
//!
//! Platform: Cross-platform (synthetic data, CI-safe)

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use regatta::test_utils::synthetic_timeline;
use regatta::{ReplayClock, TimelineStore};
use std::hint::black_box;
use std::time::Duration;
use tokio::time::Instant;

const GAME: Duration = Duration::from_secs(3600);

fn clock_for(store: &regatta::InMemoryTimeline, t0: Instant) -> ReplayClock {
    let (start, end) = futures::executor::block_on(async {
        (store.min_timestamp().await.unwrap(), store.max_timestamp().await.unwrap())
    });
    ReplayClock::new(t0, GAME, start, end).expect("valid clock")
}

fn bench_equivalent_time(c: &mut Criterion) {
    let store = synthetic_timeline(40, 80);
    let t0 = Instant::now();
    let clock = clock_for(&store, t0);

    c.bench_function("equivalent_historical_time", |b| {
        b.iter(|| clock.equivalent_historical_time(black_box(t0 + Duration::from_secs(1234))))
    });
}

fn bench_at_or_before(c: &mut Criterion) {
    let store = synthetic_timeline(40, 80);
    let t0 = Instant::now();
    let clock = clock_for(&store, t0);

    let mut group = c.benchmark_group("at_or_before");
    for minute in [1u64, 30, 60] {
        let as_of = clock.equivalent_historical_time(t0 + Duration::from_secs(minute * 60));
        let visible = store.count_at_or_before(as_of);
        group.throughput(Throughput::Elements(visible as u64));

        group.bench_with_input(BenchmarkId::new("count", minute), &as_of, |b, as_of| {
            b.iter(|| black_box(store.count_at_or_before(*as_of)))
        });
        group.bench_with_input(BenchmarkId::new("copy", minute), &as_of, |b, as_of| {
            b.iter(|| {
                futures::executor::block_on(store.observations_at_or_before(black_box(*as_of)))
                    .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_equivalent_time, bench_at_or_before);
criterion_main!(benches);
