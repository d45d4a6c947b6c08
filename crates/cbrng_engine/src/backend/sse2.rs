//! SSE2 backend: 128-bit registers, 4 x 32-bit or 2 x 64-bit lanes.

use std::arch::x86_64::*;

simd_backend! {
    Sse2, "sse2", __m128i, 16;
    zero: _mm_setzero_si128,
    load: _mm_loadu_si128,
    store: _mm_storeu_si128,
    splat32: _mm_set1_epi32,
    splat64: _mm_set1_epi64x,
    add32: _mm_add_epi32,
    add64: _mm_add_epi64,
    xor: _mm_xor_si128,
    and: _mm_and_si128,
    or: _mm_or_si128,
    mul_lo32: _mm_mul_epu32,
    srli64: _mm_srli_epi64,
    slli64: _mm_slli_epi64,
    rotl32: |a, bits| _mm_or_si128(
        _mm_sll_epi32(a, _mm_cvtsi32_si128(bits as i32)),
        _mm_srl_epi32(a, _mm_cvtsi32_si128(32 - bits as i32)),
    ),
    rotl64: |a, bits| _mm_or_si128(
        _mm_sll_epi64(a, _mm_cvtsi32_si128(bits as i32)),
        _mm_srl_epi64(a, _mm_cvtsi32_si128(64 - bits as i32)),
    ),
}
