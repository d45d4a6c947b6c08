//! AES-NI backend for AES-128/192/256 and ARS.
//!
//! Eight blocks are kept in flight so the round instructions of independent
//! blocks overlap in the pipeline. Round keys come straight from
//! [`RoundKeys`], so both AES and ARS schedules run through the same loop.

use super::lanes;
use cbrng_core::kernels::{AesFamily, RoundKeys, MAX_ROUND_KEYS};
use cbrng_core::Counter;
use std::arch::x86_64::*;

/// Blocks encrypted per pass.
const INTERLEAVE: usize = 8;

#[inline]
#[target_feature(enable = "aes,sse2")]
unsafe fn load_round_keys(schedule: &RoundKeys) -> [__m128i; MAX_ROUND_KEYS] {
    let mut keys = [_mm_setzero_si128(); MAX_ROUND_KEYS];
    for (reg, bytes) in keys.iter_mut().zip(schedule.as_slice()) {
        *reg = _mm_loadu_si128(bytes.as_ptr() as *const __m128i);
    }
    keys
}

#[target_feature(enable = "aes,sse2")]
pub(crate) unsafe fn encrypt_batch<A: AesFamily>(
    schedule: &RoundKeys,
    counter: &mut Counter<[u32; 4]>,
    out: &mut [[u32; 4]],
) {
    let rounds = schedule.rounds();
    let keys = load_round_keys(schedule);

    let mut chunks = out.chunks_exact_mut(INTERLEAVE);
    for chunk in &mut chunks {
        counter.fill_sequence(chunk);
        let mut x = [_mm_setzero_si128(); INTERLEAVE];
        for (reg, block) in x.iter_mut().zip(chunk.iter()) {
            // Little-endian words are the AES state bytes in order.
            *reg = _mm_xor_si128(
                _mm_loadu_si128(block.as_ptr() as *const __m128i),
                keys[0],
            );
        }
        for key in &keys[1..rounds] {
            for reg in x.iter_mut() {
                *reg = _mm_aesenc_si128(*reg, *key);
            }
        }
        for (reg, block) in x.iter().zip(chunk.iter_mut()) {
            let last = _mm_aesenclast_si128(*reg, keys[rounds]);
            _mm_storeu_si128(block.as_mut_ptr() as *mut __m128i, last);
        }
    }
    lanes::scalar_blocks::<A>(schedule, counter, chunks.into_remainder());
}
