//! Parallel streams match sequential generation.

#![cfg(feature = "parallel")]

use cbrng_core::kernels::*;
use cbrng_engine::{streams, CounterEngine};

#[test]
fn test_par_fill_matches_sequential_for_each_family() {
    let mut philox = CounterEngine::<Philox4x32>::new([1, 2]);
    let mut expected = philox.clone();
    let mut out = vec![[0u32; 4]; 4_099];
    streams::par_fill_blocks(&mut philox, &mut out, 256);
    let mut reference = vec![[0u32; 4]; 4_099];
    expected.next_blocks(&mut reference);
    assert_eq!(out, reference);
    assert_eq!(philox, expected);

    let mut aes = CounterEngine::<Aes128>::new([3; 4]);
    let mut expected = aes.clone();
    let mut out = vec![[0u32; 4]; 1_000];
    streams::par_fill_blocks(&mut aes, &mut out, 33);
    let mut reference = vec![[0u32; 4]; 1_000];
    expected.next_blocks(&mut reference);
    assert_eq!(out, reference);
}

#[test]
fn test_split_streams_do_not_overlap() {
    let engine = CounterEngine::<Threefry4x64>::new([1, 2, 3, 4]);
    let mut parts = streams::split(&engine, 3, 10);

    let mut joined = Vec::new();
    for part in &mut parts {
        let mut out = vec![[0u64; 4]; 10];
        part.next_blocks(&mut out);
        joined.extend(out);
    }

    let mut sequential = engine.clone();
    let mut expected = vec![[0u64; 4]; 30];
    sequential.next_blocks(&mut expected);
    assert_eq!(joined, expected);
}

#[test]
fn test_split_near_counter_end_wraps() {
    let mut engine = CounterEngine::<Philox2x32>::new([0]);
    engine.set_counter([u32::MAX - 1, u32::MAX]);
    let parts = streams::split(&engine, 2, 1);
    assert_eq!(parts[1].counter().value(), [0, 0]);
}
