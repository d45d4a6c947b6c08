//! Known-answer vectors on every backend the CPU supports.
//!
//! The scalar kernels are checked against the same tables in `cbrng_core`;
//! here each answer is produced through the engine's batched kernels.

use cbrng_core::kat::KnownAnswers;
use cbrng_core::kernels::*;
use cbrng_engine::conformance::check_known_answers;
use cbrng_engine::Backends;

fn assert_all_backends<A: Backends + KnownAnswers>() {
    let report = check_known_answers::<A>();
    assert!(
        report.passed(),
        "{} failed known answers: {:?}",
        A::NAME,
        report.mismatches
    );
    assert_eq!(
        report.cases,
        A::known_answers().len() * report.backends_checked.len()
    );
}

// ================================================================
// Philox
// ================================================================

#[test]
fn test_philox2x32_all_backends() {
    assert_all_backends::<Philox2x32>();
}

#[test]
fn test_philox4x32_all_backends() {
    assert_all_backends::<Philox4x32>();
}

#[test]
fn test_philox2x64_all_backends() {
    assert_all_backends::<Philox2x64>();
}

#[test]
fn test_philox4x64_all_backends() {
    assert_all_backends::<Philox4x64>();
}

// ================================================================
// Threefry and Threefish
// ================================================================

#[test]
fn test_threefry2x32_all_backends() {
    assert_all_backends::<Threefry2x32>();
}

#[test]
fn test_threefry4x32_all_backends() {
    assert_all_backends::<Threefry4x32>();
}

#[test]
fn test_threefry2x64_all_backends() {
    assert_all_backends::<Threefry2x64>();
}

#[test]
fn test_threefry4x64_all_backends() {
    assert_all_backends::<Threefry4x64>();
}

#[test]
fn test_threefry8x64_all_backends() {
    assert_all_backends::<Threefry8x64>();
}

#[test]
fn test_threefry16x64_all_backends() {
    assert_all_backends::<Threefry16x64>();
}

#[test]
fn test_threefish_all_backends() {
    assert_all_backends::<Threefish256>();
    assert_all_backends::<Threefish512>();
    assert_all_backends::<Threefish1024>();
}

// ================================================================
// AES and ARS
// ================================================================

#[test]
fn test_aes_all_backends() {
    assert_all_backends::<Aes128>();
    assert_all_backends::<Aes192>();
    assert_all_backends::<Aes256>();
}

#[test]
fn test_ars_all_backends() {
    assert_all_backends::<Ars>();
    assert_all_backends::<Ars<7>>();
}
