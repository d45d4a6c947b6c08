//! Cross-backend conformance harness.
//!
//! Every backend must be bit-identical to the generic one. This module
//! runs each backend the CPU supports against the generic backend over a
//! set of representative counters, and against the known-answer tables of
//! `cbrng_core::kat`. Test suites and the `cbrng verify` command both use it.
//!
//! # Example
//!
//! ```rust
//! use cbrng_core::kernels::Threefry4x32;
//! use cbrng_engine::conformance;
//!
//! let report = conformance::check_backends::<Threefry4x32>([1, 2, 3, 4], 37);
//! assert!(report.passed(), "{:?}", report.mismatches);
//!
//! let report = conformance::check_known_answers::<Threefry4x32>();
//! assert!(report.passed());
//! ```

use crate::backend::Backends;
use crate::dispatch::{capabilities, BackendKind};
use crate::engine::CounterEngine;
use cbrng_core::kat::KnownAnswers;
use cbrng_core::{Counter, Word, WordArray};
use tracing::warn;

/// Blocks generated per known answer, enough to fill every vector width.
const KAT_BATCH: usize = 17;

/// One disagreement with the reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mismatch {
    /// Backend that disagreed.
    pub backend: BackendKind,
    /// Little-endian bytes of the starting counter.
    pub counter: Vec<u8>,
    /// Index of the first differing block, or the batch length when only
    /// the final counter differs.
    pub block: usize,
}

/// Outcome of a conformance run for one algorithm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConformanceReport {
    /// Algorithm name.
    pub algorithm: &'static str,
    /// Backends compared, generic included.
    pub backends_checked: Vec<BackendKind>,
    /// Individual comparisons performed.
    pub cases: usize,
    /// Every disagreement found.
    pub mismatches: Vec<Mismatch>,
}

impl ConformanceReport {
    /// Returns `true` when no backend disagreed.
    #[inline]
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }

    fn record(&mut self, mismatch: Mismatch) {
        warn!(
            algorithm = self.algorithm,
            backend = %mismatch.backend,
            block = mismatch.block,
            "backend disagrees with reference"
        );
        self.mismatches.push(mismatch);
    }
}

/// Backends with a kernel for `A` that this CPU can run, most specialised
/// first. Always ends with [`BackendKind::Generic`].
pub fn available_backends<A: Backends>() -> Vec<BackendKind> {
    BackendKind::PREFERENCE
        .into_iter()
        .filter(|&kind| capabilities().supports(kind) && A::kernel(kind).is_some())
        .collect()
}

/// Starting counters that exercise the carry logic: zero, all ones, a
/// counter one step from carrying into each higher word, and two
/// arbitrary values.
pub fn representative_counters<A: Backends>() -> Vec<A::Block> {
    let len = A::Block::LEN;
    let mut counters = vec![A::Block::zeroed(), A::Block::splat(<A::Word as Word>::MAX)];

    for boundary in 0..len.saturating_sub(1) {
        let mut block = A::Block::zeroed();
        for word in &mut block.as_mut_slice()[..=boundary] {
            *word = <A::Word as Word>::MAX;
        }
        counters.push(block);
    }

    let arbitrary: [u128; 2] = [
        0x243F_6A88_85A3_08D3_1319_8A2E_0370_7344,
        0xA409_3822_299F_31D0_082E_FA98_EC4E_6C89,
    ];
    for seed in arbitrary {
        let mut block = A::Block::zeroed();
        for (j, word) in block.as_mut_slice().iter_mut().enumerate() {
            *word = <A::Word as Word>::from_u128_truncating(seed.rotate_left(13 * j as u32));
        }
        counters.push(block);
    }
    counters
}

/// Compares `n_blocks` blocks from every available backend against the
/// generic backend, for each representative counter.
///
/// Choose `n_blocks` above twice the widest lane count with a remainder
/// (e.g. 37) so full chunks and the scalar tail are both covered.
pub fn check_backends<A: Backends>(key: A::Key, n_blocks: usize) -> ConformanceReport {
    let backends = available_backends::<A>();
    let mut report = ConformanceReport {
        algorithm: A::NAME,
        backends_checked: backends.clone(),
        cases: 0,
        mismatches: Vec::new(),
    };

    for start in representative_counters::<A>() {
        let Some((expected, expected_end)) = run::<A>(key, start, BackendKind::Generic, n_blocks)
        else {
            continue;
        };
        for &kind in backends.iter().filter(|&&kind| kind != BackendKind::Generic) {
            let Some((actual, end)) = run::<A>(key, start, kind, n_blocks) else {
                continue;
            };
            report.cases += 1;
            let first_diff = expected
                .iter()
                .zip(&actual)
                .position(|(e, a)| e != a)
                .or((end != expected_end).then_some(n_blocks));
            if let Some(block) = first_diff {
                report.record(Mismatch {
                    backend: kind,
                    counter: Counter::new(start).to_bytes(),
                    block,
                });
            }
        }
    }
    report
}

/// Checks every known answer of `A` on every available backend.
///
/// Each answer is generated as the first block of a batch, so vector
/// backends compute it in lane 0 of a full chunk.
pub fn check_known_answers<A: Backends + KnownAnswers>() -> ConformanceReport {
    let backends = available_backends::<A>();
    let mut report = ConformanceReport {
        algorithm: A::NAME,
        backends_checked: backends.clone(),
        cases: 0,
        mismatches: Vec::new(),
    };

    for answer in A::known_answers() {
        for &kind in &backends {
            let Some((blocks, _)) = run::<A>(answer.key, answer.counter, kind, KAT_BATCH) else {
                continue;
            };
            report.cases += 1;
            if blocks[0] != answer.expected {
                report.record(Mismatch {
                    backend: kind,
                    counter: Counter::new(answer.counter).to_bytes(),
                    block: 0,
                });
            }
        }
    }
    report
}

fn run<A: Backends>(
    key: A::Key,
    start: A::Block,
    kind: BackendKind,
    n_blocks: usize,
) -> Option<(Vec<A::Block>, Counter<A::Block>)> {
    let mut engine = match CounterEngine::<A>::with_backend(key, kind) {
        Ok(engine) => engine,
        Err(err) => {
            warn!(algorithm = A::NAME, backend = %kind, error = %err, "skipping backend");
            return None;
        }
    };
    engine.set_counter(start);
    let mut out = vec![A::Block::zeroed(); n_blocks];
    engine.next_blocks(&mut out);
    Some((out, *engine.counter()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbrng_core::kernels::{Philox2x32, Philox4x64};

    #[test]
    fn test_available_ends_with_generic() {
        let backends = available_backends::<Philox4x64>();
        assert_eq!(backends.last(), Some(&BackendKind::Generic));
        assert!(!backends.contains(&BackendKind::AesNi));
    }

    #[test]
    fn test_representative_counters_cover_carries() {
        let counters = representative_counters::<Philox4x64>();
        assert!(counters.contains(&[0; 4]));
        assert!(counters.contains(&[u64::MAX; 4]));
        assert!(counters.contains(&[u64::MAX, 0, 0, 0]));
        assert!(counters.contains(&[u64::MAX, u64::MAX, 0, 0]));
        assert!(counters.contains(&[u64::MAX, u64::MAX, u64::MAX, 0]));
        assert_eq!(counters.len(), 2 + 3 + 2);
    }

    #[test]
    fn test_check_backends_passes() {
        let report = check_backends::<Philox2x32>([0xDEAD_BEEF], 37);
        assert!(report.passed(), "{:?}", report.mismatches);
        assert_eq!(report.algorithm, "philox2x32");
    }
}
