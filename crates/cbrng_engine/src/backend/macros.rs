//! Generates a word-sliced x86 backend from its intrinsics.
//!
//! A backend is a `Simd` impl plus the `#[target_feature]` entry points the
//! `Backends` tables point at. Only the register type, the feature string
//! and the intrinsic names vary between instruction sets. Rotations are
//! given as expressions; SSE2 and AVX2 build them from a shift pair.

macro_rules! simd_backend {
    (
        $backend:ident, $feature:literal, $reg:ty, $width:literal;
        zero: $zero:ident,
        load: $load:ident,
        store: $store:ident,
        splat32: $splat32:ident,
        splat64: $splat64:ident,
        add32: $add32:ident,
        add64: $add64:ident,
        xor: $xor:ident,
        and: $and:ident,
        or: $or:ident,
        mul_lo32: $mul_lo32:ident,
        srli64: $srli64:ident,
        slli64: $slli64:ident,
        rotl32: |$a32:ident, $bits32:ident| $rotl32:expr,
        rotl64: |$a64:ident, $bits64:ident| $rotl64:expr $(,)?
    ) => {
        #[derive(Clone, Copy)]
        pub(crate) struct $backend;

        impl $crate::backend::lanes::Simd for $backend {
            type Reg = $reg;
            const WIDTH: usize = $width;

            #[inline]
            #[target_feature(enable = $feature)]
            unsafe fn zero() -> $reg {
                $zero()
            }

            #[inline]
            #[target_feature(enable = $feature)]
            unsafe fn load(src: *const u8) -> $reg {
                $load(src as *const _)
            }

            #[inline]
            #[target_feature(enable = $feature)]
            unsafe fn store(dst: *mut u8, value: $reg) {
                $store(dst as *mut _, value)
            }

            #[inline]
            #[target_feature(enable = $feature)]
            unsafe fn splat32(word: u32) -> $reg {
                $splat32(word as i32)
            }

            #[inline]
            #[target_feature(enable = $feature)]
            unsafe fn splat64(word: u64) -> $reg {
                $splat64(word as i64)
            }

            #[inline]
            #[target_feature(enable = $feature)]
            unsafe fn add32(a: $reg, b: $reg) -> $reg {
                $add32(a, b)
            }

            #[inline]
            #[target_feature(enable = $feature)]
            unsafe fn add64(a: $reg, b: $reg) -> $reg {
                $add64(a, b)
            }

            #[inline]
            #[target_feature(enable = $feature)]
            unsafe fn xor(a: $reg, b: $reg) -> $reg {
                $xor(a, b)
            }

            #[inline]
            #[target_feature(enable = $feature)]
            unsafe fn and(a: $reg, b: $reg) -> $reg {
                $and(a, b)
            }

            #[inline]
            #[target_feature(enable = $feature)]
            unsafe fn or(a: $reg, b: $reg) -> $reg {
                $or(a, b)
            }

            #[inline]
            #[target_feature(enable = $feature)]
            unsafe fn mul_lo32(a: $reg, b: $reg) -> $reg {
                $mul_lo32(a, b)
            }

            #[inline]
            #[target_feature(enable = $feature)]
            unsafe fn shr64_32(a: $reg) -> $reg {
                $srli64::<32>(a)
            }

            #[inline]
            #[target_feature(enable = $feature)]
            unsafe fn shl64_32(a: $reg) -> $reg {
                $slli64::<32>(a)
            }

            #[inline]
            #[target_feature(enable = $feature)]
            unsafe fn rotl32($a32: $reg, $bits32: u32) -> $reg {
                $rotl32
            }

            #[inline]
            #[target_feature(enable = $feature)]
            unsafe fn rotl64($a64: $reg, $bits64: u32) -> $reg {
                $rotl64
            }
        }

        #[target_feature(enable = $feature)]
        pub(crate) unsafe fn philox2<W: $crate::backend::lanes::Lane, A>(
            schedule: &[W; 1],
            counter: &mut cbrng_core::Counter<[W; 2]>,
            out: &mut [[W; 2]],
        ) where
            A: cbrng_core::kernels::PhiloxParams
                + cbrng_core::kernels::Cbrng<Word = W, Block = [W; 2], Schedule = [W; 1]>,
        {
            $crate::backend::lanes::philox2::<$backend, W, A>(schedule, counter, out)
        }

        #[target_feature(enable = $feature)]
        pub(crate) unsafe fn philox4<W: $crate::backend::lanes::Lane, A>(
            schedule: &[W; 2],
            counter: &mut cbrng_core::Counter<[W; 4]>,
            out: &mut [[W; 4]],
        ) where
            A: cbrng_core::kernels::PhiloxParams
                + cbrng_core::kernels::Cbrng<Word = W, Block = [W; 4], Schedule = [W; 2]>,
        {
            $crate::backend::lanes::philox4::<$backend, W, A>(schedule, counter, out)
        }

        #[target_feature(enable = $feature)]
        pub(crate) unsafe fn threefry<W: $crate::backend::lanes::Lane, A, const K: usize>(
            schedule: &cbrng_core::kernels::ThreefrySchedule<W, K>,
            counter: &mut cbrng_core::Counter<[W; K]>,
            out: &mut [[W; K]],
        ) where
            A: cbrng_core::kernels::ThreefryParams
                + cbrng_core::kernels::Cbrng<
                    Word = W,
                    Block = [W; K],
                    Schedule = cbrng_core::kernels::ThreefrySchedule<W, K>,
                >,
        {
            $crate::backend::lanes::threefry::<$backend, W, A, K>(schedule, counter, out)
        }
    };
}
