//! AVX-512F backend: 512-bit registers, 16 x 32-bit or 8 x 64-bit lanes.
//!
//! Rotations use the native variable-rotate instructions instead of the
//! shift pair the narrower backends need.

use std::arch::x86_64::*;

simd_backend! {
    Avx512, "avx512f", __m512i, 64;
    zero: _mm512_setzero_si512,
    load: _mm512_loadu_epi32,
    store: _mm512_storeu_epi32,
    splat32: _mm512_set1_epi32,
    splat64: _mm512_set1_epi64,
    add32: _mm512_add_epi32,
    add64: _mm512_add_epi64,
    xor: _mm512_xor_si512,
    and: _mm512_and_si512,
    or: _mm512_or_si512,
    mul_lo32: _mm512_mul_epu32,
    srli64: _mm512_srli_epi64,
    slli64: _mm512_slli_epi64,
    rotl32: |a, bits| _mm512_rolv_epi32(a, _mm512_set1_epi32(bits as i32)),
    rotl64: |a, bits| _mm512_rolv_epi64(a, _mm512_set1_epi64(bits as i64)),
}
