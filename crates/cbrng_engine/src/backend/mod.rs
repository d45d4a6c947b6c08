//! Batched block kernels, one per instruction set.
//!
//! A backend is a function that encrypts consecutive counters into a slice
//! of blocks and leaves the counter after the last one. Every backend is
//! bit-identical to the scalar kernel of `cbrng_core`; they differ only in
//! how many counters they process per instruction.
//!
//! Which backends exist for an algorithm is decided at compile time by the
//! [`Backends`] impls below. Whether one may run is decided at run time by
//! [`crate::dispatch::capabilities`].

pub(crate) mod lanes;

#[cfg(target_arch = "x86_64")]
#[macro_use]
mod macros;

#[cfg(target_arch = "x86_64")]
mod aesni;
#[cfg(target_arch = "x86_64")]
mod avx2;
#[cfg(target_arch = "x86_64")]
mod avx512;
#[cfg(target_arch = "x86_64")]
mod sse2;

use crate::dispatch::{capabilities, BackendKind};
use cbrng_core::kernels::{Aes128, Aes192, Aes256, Ars, Cbrng, Philox, Threefry};
use cbrng_core::Counter;

/// A batched kernel: fills `out` from consecutive counters starting at
/// `counter` and advances `counter` past them.
///
/// # Safety
///
/// The instruction set the kernel was compiled for must be available on the
/// running CPU.
pub type BatchFn<A> = unsafe fn(
    &<A as Cbrng>::Schedule,
    &mut Counter<<A as Cbrng>::Block>,
    &mut [<A as Cbrng>::Block],
);

mod private {
    /// Restricts [`super::Backends`] to this crate.
    pub trait Sealed {}
}

/// Algorithms with batched kernels.
///
/// Implemented for every algorithm in `cbrng_core::kernels`; it cannot be
/// implemented outside this crate.
pub trait Backends: Cbrng + private::Sealed {
    /// The kernel of `kind` for this algorithm, `None` if `kind` has none.
    ///
    /// The returned function is only safe to call when the CPU supports
    /// `kind`.
    fn kernel(kind: BackendKind) -> Option<BatchFn<Self>>;
}

/// Resolves the kernel of `kind`, provided the CPU can run it.
pub(crate) fn resolve<A: Backends>(kind: BackendKind) -> Option<BatchFn<A>> {
    if capabilities().supports(kind) {
        A::kernel(kind)
    } else {
        None
    }
}

/// The scalar kernel, available everywhere.
#[inline]
pub(crate) fn generic<A: Cbrng>() -> BatchFn<A> {
    lanes::scalar_blocks::<A>
}

macro_rules! philox_backends {
    ($word:ty, $k:literal, $entry:ident) => {
        impl<const R: usize> private::Sealed for Philox<$word, $k, R> {}

        impl<const R: usize> Backends for Philox<$word, $k, R> {
            fn kernel(kind: BackendKind) -> Option<BatchFn<Self>> {
                let kernel: BatchFn<Self> = match kind {
                    BackendKind::Generic => generic::<Self>(),
                    #[cfg(target_arch = "x86_64")]
                    BackendKind::Sse2 => sse2::$entry::<$word, Self>,
                    #[cfg(target_arch = "x86_64")]
                    BackendKind::Avx2 => avx2::$entry::<$word, Self>,
                    #[cfg(target_arch = "x86_64")]
                    BackendKind::Avx512 => avx512::$entry::<$word, Self>,
                    _ => return None,
                };
                Some(kernel)
            }
        }
    };
}

philox_backends!(u32, 2, philox2);
philox_backends!(u32, 4, philox4);
philox_backends!(u64, 2, philox2);
philox_backends!(u64, 4, philox4);

macro_rules! threefry_backends {
    ($word:ty, $($k:literal),+) => {$(
        impl<const R: usize> private::Sealed for Threefry<$word, $k, R> {}

        impl<const R: usize> Backends for Threefry<$word, $k, R> {
            fn kernel(kind: BackendKind) -> Option<BatchFn<Self>> {
                let kernel: BatchFn<Self> = match kind {
                    BackendKind::Generic => generic::<Self>(),
                    #[cfg(target_arch = "x86_64")]
                    BackendKind::Sse2 => sse2::threefry::<$word, Self, $k>,
                    #[cfg(target_arch = "x86_64")]
                    BackendKind::Avx2 => avx2::threefry::<$word, Self, $k>,
                    #[cfg(target_arch = "x86_64")]
                    BackendKind::Avx512 => avx512::threefry::<$word, Self, $k>,
                    _ => return None,
                };
                Some(kernel)
            }
        }
    )+};
}

threefry_backends!(u32, 2, 4);
threefry_backends!(u64, 2, 4, 8, 16);

macro_rules! aes_backends {
    ($([$($generics:tt)*] $ty:ty),+ $(,)?) => {$(
        impl<$($generics)*> private::Sealed for $ty {}

        impl<$($generics)*> Backends for $ty {
            fn kernel(kind: BackendKind) -> Option<BatchFn<Self>> {
                let kernel: BatchFn<Self> = match kind {
                    BackendKind::Generic => generic::<Self>(),
                    #[cfg(target_arch = "x86_64")]
                    BackendKind::AesNi => aesni::encrypt_batch::<Self>,
                    _ => return None,
                };
                Some(kernel)
            }
        }
    )+};
}

aes_backends!([] Aes128, [] Aes192, [] Aes256, [const R: usize] Ars<R>);

#[cfg(test)]
mod tests {
    use super::*;
    use cbrng_core::kernels::{Philox4x32, Threefry4x64};

    #[test]
    fn test_generic_kernel_always_present() {
        assert!(Philox4x32::kernel(BackendKind::Generic).is_some());
        assert!(Threefry4x64::kernel(BackendKind::Generic).is_some());
        assert!(Aes128::kernel(BackendKind::Generic).is_some());
        assert!(<Ars>::kernel(BackendKind::Generic).is_some());
    }

    #[test]
    fn test_kernels_follow_family() {
        assert!(Philox4x32::kernel(BackendKind::AesNi).is_none());
        assert!(Aes256::kernel(BackendKind::Avx2).is_none());
        #[cfg(target_arch = "x86_64")]
        {
            assert!(Philox4x32::kernel(BackendKind::Avx2).is_some());
            assert!(<Ars>::kernel(BackendKind::AesNi).is_some());
        }
    }

    #[test]
    fn test_generic_kernel_matches_scalar() {
        let key = [7u32, 9];
        let schedule = Philox4x32::schedule(&key);
        let mut counter = Counter::new([u32::MAX - 3, 0, 0, 0]);
        let mut out = [[0u32; 4]; 3];
        let kernel = resolve::<Philox4x32>(BackendKind::Generic).unwrap();
        // SAFETY: the generic kernel runs on any CPU.
        unsafe { kernel(&schedule, &mut counter, &mut out) };

        assert_eq!(out[0], Philox4x32::generate(&key, &[u32::MAX - 3, 0, 0, 0]));
        assert_eq!(out[1], Philox4x32::generate(&key, &[0, 1, 0, 0]));
        assert_eq!(out[2], Philox4x32::generate(&key, &[4, 1, 0, 0]));
        assert_eq!(counter.value(), [8, 1, 0, 0]);
    }
}
