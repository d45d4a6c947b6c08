//! Bench command implementation
//!
//! Times every backend available for an algorithm on this CPU. For
//! statistically sound numbers use the criterion benches instead.

use std::hint::black_box;
use std::time::Instant;

use cbrng_core::WordArray;
use cbrng_engine::conformance::available_backends;
use cbrng_engine::{BackendKind, Backends, CounterEngine};
use tracing::info;

use super::{with_algorithm, Algorithm};
use crate::{CliError, Result};

/// Throughput of one backend.
#[derive(Clone, Copy, Debug)]
struct Throughput {
    backend: BackendKind,
    bytes_per_sec: f64,
}

fn measure<A: Backends>(blocks: usize, iterations: usize) -> Result<Vec<Throughput>> {
    let mut results = Vec::new();
    for backend in available_backends::<A>() {
        let mut engine = CounterEngine::<A>::with_backend(A::Key::zeroed(), backend)?;
        let mut out = vec![A::Block::zeroed(); blocks];

        // Warm-up
        engine.next_blocks(&mut out);

        let start = Instant::now();
        for _ in 0..iterations {
            engine.next_blocks(black_box(&mut out));
        }
        let seconds = start.elapsed().as_secs_f64().max(f64::EPSILON);
        let bytes = (blocks * iterations * A::Block::BYTES) as f64;
        results.push(Throughput {
            backend,
            bytes_per_sec: bytes / seconds,
        });
    }
    Ok(results)
}

/// Run the bench command
pub fn run(algorithm: Algorithm, blocks: usize, iterations: usize) -> Result<()> {
    if blocks == 0 || iterations == 0 {
        return Err(CliError::InvalidArgument(
            "--blocks and --iterations must be at least 1".to_string(),
        ));
    }
    info!(?algorithm, blocks, iterations, "benchmarking backends");

    let results = with_algorithm!(algorithm, measure(blocks, iterations))?;
    let generic = results
        .iter()
        .find(|t| t.backend == BackendKind::Generic)
        .map(|t| t.bytes_per_sec);

    println!("{:<9} {:>12} {:>9}", "backend", "MB/s", "speed-up");
    for t in &results {
        let speedup = generic.map_or(1.0, |g| t.bytes_per_sec / g);
        println!(
            "{:<9} {:>12.1} {:>8.2}x",
            t.backend.as_str(),
            t.bytes_per_sec / 1e6,
            speedup
        );
    }
    Ok(())
}
