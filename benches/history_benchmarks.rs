use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use game_booster::{
    metrics::data::{RawMemoryStats, RawStats, Sample},
    HistoryBuffer, MetricsHistory, StatsProvider, SystemCollector,
};
use std::hint::black_box;

fn sample(tick: u64) -> Sample {
    Sample::from_raw(
        tick,
        RawStats {
            cpu_percent: (tick % 100) as f32,
            memory: RawMemoryStats {
                total_bytes: 8 << 30,
                used_bytes: 2 << 30,
                available_bytes: 6 << 30,
            },
        },
    )
}

/// Benchmark pushes into a full buffer
fn bench_push(c: &mut Criterion) {
    for capacity in [100usize, 1_000, 10_000].iter() {
        c.bench_with_input(
            BenchmarkId::new("history_push", capacity),
            capacity,
            |b, &capacity| {
                let mut buffer = HistoryBuffer::new(capacity).expect("Should create buffer");
                for value in 0..capacity {
                    buffer.push(value as f32);
                }
                let mut next = 0.0f32;
                b.iter(|| {
                    next += 1.0;
                    buffer.push(black_box(next));
                })
            },
        );
    }
}

/// Benchmark ordered snapshots of a wrapped buffer
fn bench_snapshot(c: &mut Criterion) {
    let mut buffer = HistoryBuffer::new(100).expect("Should create buffer");
    for value in 0..150 {
        buffer.push(value as f32);
    }

    c.bench_function("history_snapshot", |b| b.iter(|| black_box(buffer.snapshot())));
}

/// Benchmark recording and reading through the shared history
fn bench_shared_history(c: &mut Criterion) {
    let history = MetricsHistory::new(100).expect("Should create history");
    let samples: Vec<Sample> = (1..=100).map(sample).collect();

    c.bench_function("metrics_history_record", |b| {
        b.iter(|| {
            for s in &samples {
                history.record(black_box(s));
            }
        })
    });

    c.bench_function("metrics_history_snapshot", |b| b.iter(|| black_box(history.snapshot())));
}

/// Benchmark a real system reading
fn bench_system_read(c: &mut Criterion) {
    let mut collector = SystemCollector::new().expect("Should create collector");

    c.bench_function("system_read_stats", |b| {
        b.iter(|| collector.read_stats().expect("Should read stats"))
    });
}

criterion_group!(
    benches,
    bench_push,
    bench_snapshot,
    bench_shared_history,
    bench_system_read
);
criterion_main!(benches);
