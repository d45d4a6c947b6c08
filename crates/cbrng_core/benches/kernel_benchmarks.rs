//! Criterion benchmarks for the scalar round kernels.
//!
//! Benchmarks cover:
//! - Single-block latency per algorithm
//! - Sequential block throughput (1K, 10K blocks) for the main shapes
//! - Key schedule cost for the AES family

use cbrng_core::kernels::*;
use cbrng_core::types::{Counter, WordArray};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn run_blocks<A: Cbrng>(schedule: &A::Schedule, n: usize) -> A::Block {
    let mut counter = Counter::<A::Block>::zero();
    (0..n).fold(A::Block::zeroed(), |_, _| {
        let mut block = counter.value();
        A::encrypt(schedule, &mut block);
        counter.increment_block();
        block
    })
}

fn bench_group<A: Cbrng>(c: &mut Criterion) {
    let mut group = c.benchmark_group(A::NAME);
    let schedule = A::schedule(&A::Key::zeroed());

    group.bench_function("single_block", |b| {
        let block = A::Block::zeroed();
        b.iter(|| {
            let mut out = black_box(block);
            A::encrypt(&schedule, &mut out);
            out
        });
    });

    for n_blocks in [1_000, 10_000] {
        group.bench_with_input(
            BenchmarkId::new("sequential", n_blocks),
            &n_blocks,
            |b, &n| b.iter(|| black_box(run_blocks::<A>(&schedule, n))),
        );
    }

    group.finish();
}

/// Benchmark the Philox shapes.
fn bench_philox(c: &mut Criterion) {
    bench_group::<Philox4x32>(c);
    bench_group::<Philox4x64>(c);
}

/// Benchmark the Threefry shapes.
fn bench_threefry(c: &mut Criterion) {
    bench_group::<Threefry4x32>(c);
    bench_group::<Threefry4x64>(c);
    bench_group::<Threefry16x64>(c);
}

/// Benchmark AES and ARS, including key expansion.
fn bench_aes(c: &mut Criterion) {
    bench_group::<Aes128>(c);
    bench_group::<Ars>(c);

    let mut group = c.benchmark_group("key_schedule");
    group.bench_function("aes256", |b| {
        b.iter(|| Aes256::schedule(black_box(&[7u32; 8])))
    });
    group.bench_function("ars", |b| b.iter(|| <Ars>::schedule(black_box(&[7u32; 4]))));
    group.finish();
}

criterion_group!(benches, bench_philox, bench_threefry, bench_aes);
criterion_main!(benches);
