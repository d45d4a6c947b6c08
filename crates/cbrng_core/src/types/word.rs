//! Unsigned word abstractions shared by every generator.
//!
//! Generators are parameterised by a word type (`u32` or `u64`) and by fixed
//! word arrays for keys, counters and output blocks. [`Word`] collects the
//! arithmetic the round kernels need; [`WordArray`] gives the fixed-size
//! arrays a uniform little-endian byte layout.

use num_traits::{PrimInt, WrappingAdd, WrappingMul, WrappingSub};
use std::fmt;
use std::hash::Hash;

/// Unsigned machine word used by the round kernels.
///
/// Implemented for `u32` and `u64` only. All arithmetic used by the kernels
/// is wrapping, so no operation on a [`Word`] can panic.
///
/// # Examples
/// ```
/// use cbrng_core::types::Word;
///
/// let (hi, lo) = 0xFFFF_FFFFu32.mulhilo(2);
/// assert_eq!((hi, lo), (1, 0xFFFF_FFFE));
/// ```
pub trait Word:
    PrimInt
    + WrappingAdd
    + WrappingSub
    + WrappingMul
    + Hash
    + Default
    + fmt::Debug
    + fmt::LowerHex
    + Send
    + Sync
    + 'static
{
    /// Width in bits.
    const BITS: u32;
    /// Width in bytes.
    const BYTES: usize;
    /// The value zero.
    const ZERO: Self;
    /// The value one.
    const ONE: Self;
    /// All bits set.
    const MAX: Self;

    /// Full-width product split into `(high, low)` halves.
    fn mulhilo(self, rhs: Self) -> (Self, Self);

    /// Reads a word from exactly [`Self::BYTES`] little-endian bytes.
    ///
    /// Extra bytes are ignored and missing bytes read as zero; callers
    /// validate lengths before reaching this point.
    fn from_le_slice(bytes: &[u8]) -> Self;

    /// Writes the word as little-endian bytes into `out[..Self::BYTES]`.
    fn write_le(self, out: &mut [u8]);

    /// Keeps the low [`Self::BITS`] bits of `value`.
    fn from_u128_truncating(value: u128) -> Self;

    /// Widens to `u128`.
    fn to_u128(self) -> u128;
}

macro_rules! impl_word {
    ($ty:ty, $wide:ty) => {
        impl Word for $ty {
            const BITS: u32 = <$ty>::BITS;
            const BYTES: usize = std::mem::size_of::<$ty>();
            const ZERO: Self = 0;
            const ONE: Self = 1;
            const MAX: Self = <$ty>::MAX;

            #[inline(always)]
            fn mulhilo(self, rhs: Self) -> (Self, Self) {
                let product = (self as $wide) * (rhs as $wide);
                ((product >> <$ty>::BITS) as $ty, product as $ty)
            }

            #[inline]
            fn from_le_slice(bytes: &[u8]) -> Self {
                bytes
                    .iter()
                    .take(Self::BYTES)
                    .rev()
                    .fold(0, |acc, &b| (acc << 8) | b as $ty)
            }

            #[inline]
            fn write_le(self, out: &mut [u8]) {
                out[..Self::BYTES].copy_from_slice(&self.to_le_bytes());
            }

            #[inline(always)]
            fn from_u128_truncating(value: u128) -> Self {
                value as $ty
            }

            #[inline(always)]
            fn to_u128(self) -> u128 {
                self as u128
            }
        }
    };
}

impl_word!(u32, u64);
impl_word!(u64, u128);

/// Fixed-size array of [`Word`]s: a key, a counter or an output block.
///
/// The external byte representation is the concatenation of each word's
/// little-endian bytes, word 0 first, independent of host endianness.
pub trait WordArray: Copy + fmt::Debug + PartialEq + Eq + Hash + Send + Sync + 'static {
    /// Element type.
    type Word: Word;

    /// Number of words.
    const LEN: usize;

    /// Size of the byte representation.
    const BYTES: usize;

    /// Array with every word zero.
    fn zeroed() -> Self;

    /// Array with every word set to `word`.
    fn splat(word: Self::Word) -> Self;

    /// Borrow as a slice.
    fn as_slice(&self) -> &[Self::Word];

    /// Borrow as a mutable slice.
    fn as_mut_slice(&mut self) -> &mut [Self::Word];

    /// Writes the little-endian byte layout into `out[..Self::BYTES]`.
    fn write_le_bytes(&self, out: &mut [u8]) {
        for (word, chunk) in self
            .as_slice()
            .iter()
            .zip(out.chunks_exact_mut(<Self::Word as Word>::BYTES))
        {
            word.write_le(chunk);
        }
    }

    /// Returns the little-endian byte layout.
    fn to_le_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; Self::BYTES];
        self.write_le_bytes(&mut out);
        out
    }

    /// Parses the little-endian byte layout, `None` on length mismatch.
    fn from_le_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::BYTES {
            return None;
        }
        let mut out = Self::zeroed();
        for (word, chunk) in out
            .as_mut_slice()
            .iter_mut()
            .zip(bytes.chunks_exact(<Self::Word as Word>::BYTES))
        {
            *word = <Self::Word as Word>::from_le_slice(chunk);
        }
        Some(out)
    }
}

impl<W: Word, const N: usize> WordArray for [W; N] {
    type Word = W;
    const LEN: usize = N;
    const BYTES: usize = N * W::BYTES;

    #[inline(always)]
    fn zeroed() -> Self {
        [W::ZERO; N]
    }

    #[inline(always)]
    fn splat(word: W) -> Self {
        [word; N]
    }

    #[inline(always)]
    fn as_slice(&self) -> &[W] {
        self
    }

    #[inline(always)]
    fn as_mut_slice(&mut self) -> &mut [W] {
        self
    }
}
