//! Harvest, export and merge benchmarks
//!
//! Harvest drains a full reservoir highest priority first; export clones the
//! retained events without mutating; merge folds a producer-local reservoir
//! into a shared one.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

mod common;
use common::*;

fn bench_harvest(c: &mut Criterion) {
    let mut group = c.benchmark_group("harvest");

    for &capacity in CAPACITIES {
        let priorities = uniform_priorities(capacity * 2);
        group.throughput(Throughput::Elements(capacity as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, &capacity| {
                b.iter_batched(
                    || filled_reservoir(capacity, &priorities),
                    |mut reservoir| black_box(reservoir.harvest()),
                    criterion::BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");

    for &capacity in CAPACITIES {
        let reservoir = filled_reservoir(capacity, &uniform_priorities(capacity * 2));
        group.throughput(Throughput::Elements(capacity as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &reservoir,
            |b, reservoir| {
                b.iter(|| {
                    let mut sink = Vec::with_capacity(capacity);
                    reservoir.export(&mut sink);
                    black_box(sink)
                });
            },
        );
    }

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    let capacity = 1_000;

    for &local in &[100usize, 1_000, 10_000] {
        let target = uniform_priorities(capacity * 2);
        let incoming = clustered_priorities(local);
        group.throughput(Throughput::Elements(local as u64));
        group.bench_with_input(BenchmarkId::from_parameter(local), &local, |b, _| {
            b.iter_batched(
                || {
                    (
                        filled_reservoir(capacity, &target),
                        filled_reservoir(local, &incoming),
                    )
                },
                |(mut shared, other)| {
                    shared.merge(other).unwrap();
                    black_box(shared)
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_harvest, bench_export, bench_merge);
criterion_main!(benches);
