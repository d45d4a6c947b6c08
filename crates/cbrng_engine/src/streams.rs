//! Parallel streams over disjoint counter ranges.
//!
//! A counter-based engine can jump to any block in constant time, so
//! parallel consumers need no coordination: each one takes a clone that has
//! discarded up to its own range. The output of [`par_fill_blocks`] is
//! therefore identical to a sequential fill, whatever the thread count.
//!
//! # Example
//!
//! ```rust
//! use cbrng_core::kernels::Philox4x32;
//! use cbrng_engine::{streams, CounterEngine};
//!
//! let mut engine = CounterEngine::<Philox4x32>::new([1, 2]);
//! let mut sequential = engine.clone();
//!
//! let mut parallel_out = vec![[0u32; 4]; 10_000];
//! streams::par_fill_blocks(&mut engine, &mut parallel_out, 512);
//!
//! let mut sequential_out = vec![[0u32; 4]; 10_000];
//! sequential.next_blocks(&mut sequential_out);
//!
//! assert_eq!(parallel_out, sequential_out);
//! assert_eq!(engine, sequential);
//! ```

use crate::backend::Backends;
use crate::engine::CounterEngine;
use rayon::prelude::*;

/// Returns `count` engines starting `blocks_per_stream` blocks apart,
/// the first at `engine`'s current position.
///
/// Streams do not overlap as long as each consumes at most
/// `blocks_per_stream` blocks.
pub fn split<A: Backends>(
    engine: &CounterEngine<A>,
    count: usize,
    blocks_per_stream: u64,
) -> Vec<CounterEngine<A>> {
    let mut cursor = engine.clone();
    let mut streams = Vec::with_capacity(count);
    for _ in 0..count {
        streams.push(cursor.clone());
        cursor.discard(blocks_per_stream);
    }
    tracing::debug!(
        algorithm = A::NAME,
        count,
        blocks_per_stream,
        "split engine into streams"
    );
    streams
}

/// Fills `out` in parallel, `chunk_blocks` blocks per task, and advances
/// `engine` past the filled range.
///
/// A `chunk_blocks` of zero is treated as one.
pub fn par_fill_blocks<A: Backends>(
    engine: &mut CounterEngine<A>,
    out: &mut [A::Block],
    chunk_blocks: usize,
) {
    let chunk = chunk_blocks.max(1);
    let base = &*engine;
    out.par_chunks_mut(chunk)
        .enumerate()
        .for_each(|(i, blocks)| {
            let mut local = base.clone();
            local.discard((i * chunk) as u64);
            local.next_blocks(blocks);
        });
    engine.discard(out.len() as u64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbrng_core::kernels::Threefry2x64;

    #[test]
    fn test_split_streams_are_contiguous() {
        let engine = CounterEngine::<Threefry2x64>::new([3, 5]);
        let streams = split(&engine, 4, 100);
        assert_eq!(streams.len(), 4);

        let mut walker = engine.clone();
        for stream in &streams {
            assert_eq!(stream, &walker);
            walker.discard(100);
        }
    }

    #[test]
    fn test_par_fill_uneven_chunks() {
        let mut engine = CounterEngine::<Threefry2x64>::new([1, 1]);
        let mut sequential = engine.clone();

        let mut out = vec![[0u64; 2]; 1_001];
        par_fill_blocks(&mut engine, &mut out, 64);
        let mut expected = vec![[0u64; 2]; 1_001];
        sequential.next_blocks(&mut expected);

        assert_eq!(out, expected);
        assert_eq!(engine.next_block(), sequential.next_block());
    }

    #[test]
    fn test_par_fill_zero_chunk() {
        let mut engine = CounterEngine::<Threefry2x64>::new([0, 0]);
        let mut out = vec![[0u64; 2]; 3];
        par_fill_blocks(&mut engine, &mut out, 0);
        assert_eq!(engine.counter().value(), [6, 0]);
    }
}
