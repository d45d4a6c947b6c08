//! AVX2 backend: 256-bit registers, 8 x 32-bit or 4 x 64-bit lanes.
//!
//! Variable shifts take their count from the low lane of an SSE register.

use std::arch::x86_64::*;

simd_backend! {
    Avx2, "avx2", __m256i, 32;
    zero: _mm256_setzero_si256,
    load: _mm256_loadu_si256,
    store: _mm256_storeu_si256,
    splat32: _mm256_set1_epi32,
    splat64: _mm256_set1_epi64x,
    add32: _mm256_add_epi32,
    add64: _mm256_add_epi64,
    xor: _mm256_xor_si256,
    and: _mm256_and_si256,
    or: _mm256_or_si256,
    mul_lo32: _mm256_mul_epu32,
    srli64: _mm256_srli_epi64,
    slli64: _mm256_slli_epi64,
    rotl32: |a, bits| _mm256_or_si256(
        _mm256_sll_epi32(a, _mm_cvtsi32_si128(bits as i32)),
        _mm256_srl_epi32(a, _mm_cvtsi32_si128(32 - bits as i32)),
    ),
    rotl64: |a, bits| _mm256_or_si256(
        _mm256_sll_epi64(a, _mm_cvtsi32_si128(bits as i32)),
        _mm256_srl_epi64(a, _mm_cvtsi32_si128(64 - bits as i32)),
    ),
}
