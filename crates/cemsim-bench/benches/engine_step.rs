//! Criterion benchmarks for Yee-grid stepping.

use std::hint::black_box;

use cemsim_bench::{reference_profile, stress_profile};
use cemsim_core::StepIndex;
use cemsim_engine::create_engine;
use criterion::{criterion_group, criterion_main, Criterion};

/// Benchmark: one step on the 1 000-cell reference grid.
fn bench_step_reference(c: &mut Criterion) {
    let config = reference_profile();
    let mut engine = create_engine(&config).unwrap();
    let mut step = 0u64;

    c.bench_function("yee1d_step_1k", |b| {
        b.iter(|| {
            engine.advance(StepIndex(step % 1_000)).unwrap();
            step += 1;
            black_box(&engine);
        });
    });
}

/// Benchmark: one step on the 100 000-cell lossy grid.
fn bench_step_stress(c: &mut Criterion) {
    let config = stress_profile();
    let mut engine = create_engine(&config).unwrap();
    let mut step = 0u64;

    c.bench_function("yee1d_lossy_step_100k", |b| {
        b.iter(|| {
            engine.advance(StepIndex(step % 200)).unwrap();
            step += 1;
            black_box(&engine);
        });
    });
}

criterion_group!(benches, bench_step_reference, bench_step_stress);
criterion_main!(benches);
