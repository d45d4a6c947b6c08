//! Criterion benchmarks for the dispatched engines.
//!
//! Benchmarks cover:
//! - Batched throughput of every backend the CPU supports, per algorithm
//! - Word-stream throughput through `CounterRng`
//! - Parallel fills against the sequential fill

use cbrng_core::kernels::*;
use cbrng_core::WordArray;
use cbrng_engine::conformance::available_backends;
use cbrng_engine::{Backends, CounterEngine, CounterRng};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::RngCore;

const BATCH_BLOCKS: usize = 1024;

fn bench_backends<A: Backends>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("{}/backends", A::NAME));
    group.throughput(Throughput::Bytes((BATCH_BLOCKS * A::Block::BYTES) as u64));

    for kind in available_backends::<A>() {
        let Ok(mut engine) = CounterEngine::<A>::with_backend(A::Key::zeroed(), kind) else {
            continue;
        };
        let mut out = vec![A::Block::zeroed(); BATCH_BLOCKS];
        group.bench_function(BenchmarkId::from_parameter(kind), |b| {
            b.iter(|| {
                engine.next_blocks(black_box(&mut out));
            });
        });
    }

    group.finish();
}

/// Benchmark every backend of the Philox shapes.
fn bench_philox(c: &mut Criterion) {
    bench_backends::<Philox2x32>(c);
    bench_backends::<Philox4x32>(c);
    bench_backends::<Philox4x64>(c);
}

/// Benchmark every backend of the Threefry shapes.
fn bench_threefry(c: &mut Criterion) {
    bench_backends::<Threefry4x32>(c);
    bench_backends::<Threefry4x64>(c);
    bench_backends::<Threefry16x64>(c);
}

/// Benchmark AES-NI against the byte-oriented AES.
fn bench_aes(c: &mut Criterion) {
    bench_backends::<Aes128>(c);
    bench_backends::<Aes256>(c);
    bench_backends::<Ars>(c);
}

/// Benchmark the `RngCore` adaptor.
fn bench_rng(c: &mut Criterion) {
    let mut group = c.benchmark_group("counter_rng");
    let mut rng = CounterRng::new(CounterEngine::<Philox4x32>::from_seed(1));

    group.bench_function("next_u64", |b| b.iter(|| black_box(rng.next_u64())));

    for size in [1_024usize, 65_536] {
        let mut bytes = vec![0u8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("fill_bytes", size), &size, |b, _| {
            b.iter(|| rng.fill_bytes(black_box(&mut bytes)));
        });

        let mut words = vec![0u32; size / 4];
        group.bench_with_input(BenchmarkId::new("fill_words", size), &size, |b, _| {
            b.iter(|| rng.fill_words(black_box(&mut words)));
        });
    }

    group.finish();
}

/// Benchmark parallel against sequential bulk fills.
#[cfg(feature = "parallel")]
fn bench_parallel(c: &mut Criterion) {
    use cbrng_engine::streams;

    let mut group = c.benchmark_group("parallel_fill");
    let n_blocks = 1 << 18;
    group.throughput(Throughput::Bytes((n_blocks * 16) as u64));
    let mut engine = CounterEngine::<Philox4x32>::from_seed(7);
    let mut out = vec![[0u32; 4]; n_blocks];

    group.bench_function("sequential", |b| {
        b.iter(|| engine.next_blocks(black_box(&mut out)));
    });
    for chunk in [4_096usize, 32_768] {
        group.bench_with_input(BenchmarkId::new("rayon", chunk), &chunk, |b, &chunk| {
            b.iter(|| streams::par_fill_blocks(&mut engine, black_box(&mut out), chunk));
        });
    }

    group.finish();
}

#[cfg(not(feature = "parallel"))]
fn bench_parallel(_c: &mut Criterion) {}

criterion_group!(
    benches,
    bench_philox,
    bench_threefry,
    bench_aes,
    bench_rng,
    bench_parallel
);
criterion_main!(benches);
