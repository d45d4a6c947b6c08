//! Info command implementation
//!
//! Reports the detected CPU capabilities and, per algorithm, the backend an
//! engine binds to by default.

use cbrng_core::{Family, WordArray};
use cbrng_engine::conformance::available_backends;
use cbrng_engine::{capabilities, BackendKind, Backends, CounterEngine, BACKEND_ENV};
use serde::Serialize;
use tracing::info;

use super::{with_algorithm, Algorithm};
use crate::Result;

#[derive(Debug, Serialize)]
struct InfoReport {
    supported: Vec<BackendKind>,
    preferred: Option<BackendKind>,
    algorithms: Vec<AlgorithmRow>,
}

#[derive(Debug, Serialize)]
struct AlgorithmRow {
    name: &'static str,
    family: Family,
    rounds: usize,
    key_bytes: usize,
    block_bytes: usize,
    selected: BackendKind,
    available: Vec<BackendKind>,
}

fn row<A: Backends>() -> AlgorithmRow {
    AlgorithmRow {
        name: A::NAME,
        family: A::FAMILY,
        rounds: A::ROUNDS,
        key_bytes: A::Key::BYTES,
        block_bytes: A::Block::BYTES,
        selected: CounterEngine::<A>::new(A::Key::zeroed()).backend(),
        available: available_backends::<A>(),
    }
}

fn report() -> InfoReport {
    let caps = capabilities();
    InfoReport {
        supported: BackendKind::PREFERENCE
            .into_iter()
            .filter(|&kind| caps.supports(kind))
            .collect(),
        preferred: caps.preferred(),
        algorithms: Algorithm::all()
            .iter()
            .map(|&algorithm| with_algorithm!(algorithm, row()))
            .collect(),
    }
}

fn join(kinds: &[BackendKind]) -> String {
    kinds
        .iter()
        .map(|kind| kind.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Run the info command
pub fn run(json: bool) -> Result<()> {
    let report = report();
    info!(supported = %join(&report.supported), "collected capability report");

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Supported backends: {}", join(&report.supported));
    match report.preferred {
        Some(kind) => println!("{} override: {}", BACKEND_ENV, kind),
        None => println!("{} override: none", BACKEND_ENV),
    }
    println!();
    println!(
        "{:<14} {:<9} {:>6} {:>5} {:>7} {:<9} available",
        "algorithm", "family", "rounds", "key", "block", "selected"
    );
    for row in &report.algorithms {
        println!(
            "{:<14} {:<9} {:>6} {:>5} {:>7} {:<9} {}",
            row.name,
            row.family.to_string(),
            row.rounds,
            row.key_bytes,
            row.block_bytes,
            row.selected.as_str(),
            join(&row.available)
        );
    }
    Ok(())
}
