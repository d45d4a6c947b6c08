//! Word-sliced kernels shared by the SSE2, AVX2 and AVX-512 backends.
//!
//! A register holds word `i` of `L` consecutive blocks (`L` = register width
//! divided by word size). Counters are laid out with
//! [`Counter::fill_sequence`], transposed into per-word lane arrays, run
//! through the rounds lane-parallel and transposed back, so each lane
//! computes exactly what the scalar kernel computes for its counter.
//! A trailing partial chunk goes through the scalar kernel.
//!
//! Each backend only provides the register primitives in [`Simd`]; the
//! word-width specific pieces (notably the 64-bit multiply, which x86 lacks
//! and is built from four 32x32 products) live in [`Lane`].

use cbrng_core::kernels::{Cbrng, PhiloxParams, ThreefryParams, ThreefrySchedule};
use cbrng_core::{Counter, Word};

/// Most lanes any backend uses: 16 x 32-bit words in 512 bits.
pub(crate) const MAX_LANES: usize = 16;

/// Register primitives of one instruction set.
///
/// # Safety
///
/// Every method requires the instruction set to be available on the
/// running CPU. `load` and `store` access `WIDTH` bytes at the pointer.
pub(crate) trait Simd: Copy {
    type Reg: Copy;

    /// Register width in bytes.
    const WIDTH: usize;

    unsafe fn zero() -> Self::Reg;
    unsafe fn load(src: *const u8) -> Self::Reg;
    unsafe fn store(dst: *mut u8, value: Self::Reg);
    unsafe fn splat32(word: u32) -> Self::Reg;
    unsafe fn splat64(word: u64) -> Self::Reg;
    unsafe fn add32(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    unsafe fn add64(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    unsafe fn xor(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    unsafe fn and(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    unsafe fn or(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Full 64-bit products of the low 32 bits of each 64-bit lane.
    unsafe fn mul_lo32(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Shift each 64-bit lane right by 32.
    unsafe fn shr64_32(a: Self::Reg) -> Self::Reg;
    /// Shift each 64-bit lane left by 32.
    unsafe fn shl64_32(a: Self::Reg) -> Self::Reg;
    unsafe fn rotl32(a: Self::Reg, bits: u32) -> Self::Reg;
    unsafe fn rotl64(a: Self::Reg, bits: u32) -> Self::Reg;
}

/// Word-width specific lane operations.
pub(crate) trait Lane: Word {
    unsafe fn vsplat<S: Simd>(word: Self) -> S::Reg;
    unsafe fn vadd<S: Simd>(a: S::Reg, b: S::Reg) -> S::Reg;
    unsafe fn vrotl<S: Simd>(a: S::Reg, bits: u32) -> S::Reg;
    /// Lane-wise `(high, low)` halves of the full product.
    unsafe fn vmulhilo<S: Simd>(a: S::Reg, b: S::Reg) -> (S::Reg, S::Reg);
}

impl Lane for u32 {
    #[inline(always)]
    unsafe fn vsplat<S: Simd>(word: u32) -> S::Reg {
        S::splat32(word)
    }

    #[inline(always)]
    unsafe fn vadd<S: Simd>(a: S::Reg, b: S::Reg) -> S::Reg {
        S::add32(a, b)
    }

    #[inline(always)]
    unsafe fn vrotl<S: Simd>(a: S::Reg, bits: u32) -> S::Reg {
        S::rotl32(a, bits)
    }

    #[inline(always)]
    unsafe fn vmulhilo<S: Simd>(a: S::Reg, b: S::Reg) -> (S::Reg, S::Reg) {
        // Even lanes multiply in place, odd lanes after shifting down; the
        // halves are then recombined into 32-bit lanes.
        let low_mask = S::splat64(0x0000_0000_FFFF_FFFF);
        let high_mask = S::splat64(0xFFFF_FFFF_0000_0000);
        let even = S::mul_lo32(a, b);
        let odd = S::mul_lo32(S::shr64_32(a), S::shr64_32(b));
        let lo = S::or(S::and(even, low_mask), S::shl64_32(odd));
        let hi = S::or(S::shr64_32(even), S::and(odd, high_mask));
        (hi, lo)
    }
}

impl Lane for u64 {
    #[inline(always)]
    unsafe fn vsplat<S: Simd>(word: u64) -> S::Reg {
        S::splat64(word)
    }

    #[inline(always)]
    unsafe fn vadd<S: Simd>(a: S::Reg, b: S::Reg) -> S::Reg {
        S::add64(a, b)
    }

    #[inline(always)]
    unsafe fn vrotl<S: Simd>(a: S::Reg, bits: u32) -> S::Reg {
        S::rotl64(a, bits)
    }

    #[inline(always)]
    unsafe fn vmulhilo<S: Simd>(a: S::Reg, b: S::Reg) -> (S::Reg, S::Reg) {
        // Schoolbook product from four 32x32->64 partial products. The
        // middle column sum `mid` cannot overflow 64 bits.
        let mask = S::splat64(0x0000_0000_FFFF_FFFF);
        let a_hi = S::shr64_32(a);
        let b_hi = S::shr64_32(b);
        let ll = S::mul_lo32(a, b);
        let hl = S::mul_lo32(a_hi, b);
        let lh = S::mul_lo32(a, b_hi);
        let hh = S::mul_lo32(a_hi, b_hi);
        let mid = S::add64(
            S::add64(S::shr64_32(ll), S::and(hl, mask)),
            S::and(lh, mask),
        );
        let lo = S::or(S::and(ll, mask), S::shl64_32(mid));
        let hi = S::add64(
            S::add64(hh, S::shr64_32(hl)),
            S::add64(S::shr64_32(lh), S::shr64_32(mid)),
        );
        (hi, lo)
    }
}

/// Number of blocks processed per register pass.
#[inline(always)]
pub(crate) fn lanes<S: Simd, W: Word>() -> usize {
    S::WIDTH / W::BYTES
}

/// Runs the scalar kernel over `out`, advancing `counter` block by block.
///
/// This is the whole generic backend and the tail of every vector backend.
#[inline(always)]
pub(crate) fn scalar_blocks<A: Cbrng>(
    schedule: &A::Schedule,
    counter: &mut Counter<A::Block>,
    out: &mut [A::Block],
) {
    for block in out {
        *block = counter.value();
        A::encrypt(schedule, block);
        counter.increment_block();
    }
}

/// Loads the next `lanes` counters, word-sliced, into registers.
#[inline(always)]
unsafe fn gather<S: Simd, W: Lane, const K: usize>(
    counter: &mut Counter<[W; K]>,
    staging: &mut [[W; K]; MAX_LANES],
    soa: &mut [[W; MAX_LANES]; K],
    lanes: usize,
) -> [S::Reg; K] {
    counter.fill_sequence(&mut staging[..lanes]);
    for (l, block) in staging[..lanes].iter().enumerate() {
        for (i, &word) in block.iter().enumerate() {
            soa[i][l] = word;
        }
    }
    let mut x = [S::zero(); K];
    for (reg, words) in x.iter_mut().zip(soa.iter()) {
        *reg = S::load(words.as_ptr() as *const u8);
    }
    x
}

/// Stores registers and scatters lanes back into block order.
#[inline(always)]
unsafe fn scatter<S: Simd, W: Lane, const K: usize>(
    x: &[S::Reg; K],
    soa: &mut [[W; MAX_LANES]; K],
    out: &mut [[W; K]],
) {
    for (reg, words) in x.iter().zip(soa.iter_mut()) {
        S::store(words.as_mut_ptr() as *mut u8, *reg);
    }
    for (l, block) in out.iter_mut().enumerate() {
        for (i, word) in block.iter_mut().enumerate() {
            *word = soa[i][l];
        }
    }
}

/// Two-word Philox over `L` lanes.
#[inline(always)]
pub(crate) unsafe fn philox2<S: Simd, W: Lane, A>(
    schedule: &[W; 1],
    counter: &mut Counter<[W; 2]>,
    out: &mut [[W; 2]],
) where
    A: PhiloxParams + Cbrng<Word = W, Block = [W; 2], Schedule = [W; 1]>,
{
    let lanes = lanes::<S, W>();
    let multiplier = W::vsplat::<S>(A::MULTIPLIERS[0]);
    let mut staging = [[W::ZERO; 2]; MAX_LANES];
    let mut soa = [[W::ZERO; MAX_LANES]; 2];

    let mut chunks = out.chunks_exact_mut(lanes);
    for chunk in &mut chunks {
        let mut x = gather::<S, W, 2>(counter, &mut staging, &mut soa, lanes);
        let mut key = schedule[0];
        for round in 0..A::ROUNDS {
            if round > 0 {
                key = key.wrapping_add(&A::WEYL[0]);
            }
            let (hi, lo) = W::vmulhilo::<S>(x[0], multiplier);
            x = [S::xor(S::xor(hi, W::vsplat::<S>(key)), x[1]), lo];
        }
        scatter::<S, W, 2>(&x, &mut soa, chunk);
    }
    scalar_blocks::<A>(schedule, counter, chunks.into_remainder());
}

/// Four-word Philox over `L` lanes.
#[inline(always)]
pub(crate) unsafe fn philox4<S: Simd, W: Lane, A>(
    schedule: &[W; 2],
    counter: &mut Counter<[W; 4]>,
    out: &mut [[W; 4]],
) where
    A: PhiloxParams + Cbrng<Word = W, Block = [W; 4], Schedule = [W; 2]>,
{
    let lanes = lanes::<S, W>();
    let m0 = W::vsplat::<S>(A::MULTIPLIERS[0]);
    let m1 = W::vsplat::<S>(A::MULTIPLIERS[1]);
    let mut staging = [[W::ZERO; 4]; MAX_LANES];
    let mut soa = [[W::ZERO; MAX_LANES]; 4];

    let mut chunks = out.chunks_exact_mut(lanes);
    for chunk in &mut chunks {
        let mut x = gather::<S, W, 4>(counter, &mut staging, &mut soa, lanes);
        let [mut k0, mut k1] = *schedule;
        for round in 0..A::ROUNDS {
            if round > 0 {
                k0 = k0.wrapping_add(&A::WEYL[0]);
                k1 = k1.wrapping_add(&A::WEYL[1]);
            }
            let (hi0, lo0) = W::vmulhilo::<S>(x[0], m0);
            let (hi1, lo1) = W::vmulhilo::<S>(x[2], m1);
            x = [
                S::xor(S::xor(hi1, x[1]), W::vsplat::<S>(k0)),
                lo1,
                S::xor(S::xor(hi0, x[3]), W::vsplat::<S>(k1)),
                lo0,
            ];
        }
        scatter::<S, W, 4>(&x, &mut soa, chunk);
    }
    scalar_blocks::<A>(schedule, counter, chunks.into_remainder());
}

#[inline(always)]
unsafe fn inject<S: Simd, W: Lane, const K: usize>(
    x: &mut [S::Reg; K],
    schedule: &ThreefrySchedule<W, K>,
    s: usize,
) {
    for (reg, word) in x.iter_mut().zip(schedule.injection(s)) {
        *reg = W::vadd::<S>(*reg, W::vsplat::<S>(word));
    }
}

/// Threefry of any shape over `L` lanes.
///
/// The word permutation is a renaming of registers and costs no shuffles.
#[inline(always)]
pub(crate) unsafe fn threefry<S: Simd, W: Lane, A, const K: usize>(
    schedule: &ThreefrySchedule<W, K>,
    counter: &mut Counter<[W; K]>,
    out: &mut [[W; K]],
) where
    A: ThreefryParams + Cbrng<Word = W, Block = [W; K], Schedule = ThreefrySchedule<W, K>>,
{
    let lanes = lanes::<S, W>();
    let mut staging = [[W::ZERO; K]; MAX_LANES];
    let mut soa = [[W::ZERO; MAX_LANES]; K];

    let mut chunks = out.chunks_exact_mut(lanes);
    for chunk in &mut chunks {
        let mut x = gather::<S, W, K>(counter, &mut staging, &mut soa, lanes);
        inject::<S, W, K>(&mut x, schedule, 0);
        for n in 1..=A::ROUNDS {
            let column = (n - 1) % 8;
            for (j, rotation) in A::ROTATIONS.iter().enumerate() {
                let (a, b) = (2 * j, 2 * j + 1);
                x[a] = W::vadd::<S>(x[a], x[b]);
                x[b] = S::xor(W::vrotl::<S>(x[b], rotation[column]), x[a]);
            }
            let previous = x;
            for (reg, &source) in x.iter_mut().zip(A::PERMUTATION) {
                *reg = previous[source];
            }
            if n % 4 == 0 {
                inject::<S, W, K>(&mut x, schedule, n / 4);
            }
        }
        scatter::<S, W, K>(&x, &mut soa, chunk);
    }
    scalar_blocks::<A>(schedule, counter, chunks.into_remainder());
}
