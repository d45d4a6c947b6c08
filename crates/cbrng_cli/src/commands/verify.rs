//! Verify command implementation
//!
//! Runs the conformance harness: every available backend against the
//! generic one, then every backend against the known answers.

use cbrng_core::kat::KnownAnswers;
use cbrng_core::Key;
use cbrng_engine::conformance::{check_backends, check_known_answers, ConformanceReport};
use cbrng_engine::Backends;
use tracing::info;

use super::{with_algorithm, Algorithm};
use crate::{CliError, Result};

/// Longest key of any algorithm, in bytes.
const MAX_KEY_BYTES: usize = 128;

fn test_key<A: Backends>() -> A::Key {
    let bytes: Vec<u8> = (0..MAX_KEY_BYTES as u8)
        .map(|i| i.wrapping_mul(0x9D) ^ 0x5A)
        .collect();
    *Key::<A::Key>::from_prefix(&bytes).words()
}

fn verify<A: Backends + KnownAnswers>(blocks: usize) -> [ConformanceReport; 2] {
    [
        check_backends::<A>(test_key::<A>(), blocks),
        check_known_answers::<A>(),
    ]
}

fn summarise(report: &ConformanceReport, kind: &str) {
    let backends = report
        .backends_checked
        .iter()
        .map(|b| b.as_str())
        .collect::<Vec<_>>()
        .join(",");
    let status = if report.passed() { "ok" } else { "FAILED" };
    println!(
        "{:<14} {:<14} {:>5} cases  [{}]  {}",
        report.algorithm, kind, report.cases, backends, status
    );
    for mismatch in &report.mismatches {
        println!(
            "    {} differs at block {} from counter {:02x?}",
            mismatch.backend, mismatch.block, mismatch.counter
        );
    }
}

/// Run the verify command
pub fn run(algorithm: Option<Algorithm>, blocks: usize) -> Result<()> {
    if blocks == 0 {
        return Err(CliError::InvalidArgument(
            "--blocks must be at least 1".to_string(),
        ));
    }
    let algorithms = match algorithm {
        Some(algorithm) => vec![algorithm],
        None => Algorithm::all().to_vec(),
    };
    info!(algorithms = algorithms.len(), blocks, "running conformance checks");

    let mut failures = 0;
    for algorithm in algorithms {
        let [backends, answers] = with_algorithm!(algorithm, verify(blocks));
        summarise(&backends, "cross-backend");
        summarise(&answers, "known-answers");
        failures += backends.mismatches.len() + answers.mismatches.len();
    }

    if failures > 0 {
        return Err(CliError::ConformanceFailed(failures));
    }
    info!("all backends conform");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbrng_core::kernels::{Aes128, Threefry16x64};

    #[test]
    fn test_key_fills_longest_key() {
        let key = test_key::<Threefry16x64>();
        assert!(key.iter().all(|&word| word != 0));
    }

    #[test]
    fn test_verify_single_algorithm() {
        let [backends, answers] = verify::<Aes128>(37);
        assert!(backends.passed());
        assert!(answers.passed());
        assert!(answers.cases > 0);
    }

    #[test]
    fn test_run_rejects_zero_blocks() {
        assert!(run(Some(Algorithm::Philox4x32), 0).is_err());
        assert!(run(Some(Algorithm::Philox4x32), 37).is_ok());
    }
}
