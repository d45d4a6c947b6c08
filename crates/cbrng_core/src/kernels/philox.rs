//! Philox: multiply-high/low rounds over 2 or 4 words.
//!
//! Each round multiplies selected words by fixed odd constants and folds
//! the high half of each product into the neighbouring word together with a
//! round key. Round keys start at the key and are bumped by Weyl constants
//! before every round except the first.
//!
//! # Round function
//!
//! - 2 words: `[hi(M*x0) ^ k0 ^ x1, lo(M*x0)]`
//! - 4 words: with `p0 = M0*x0` and `p1 = M1*x2`,
//!   `[hi(p1) ^ x1 ^ k0, lo(p1), hi(p0) ^ x3 ^ k1, lo(p0)]`

use super::{Cbrng, Family};
use crate::types::Word;
use std::marker::PhantomData;

/// Philox generator over `K` words of type `W` with `R` rounds.
///
/// Only the published shapes exist: `u32`/`u64` words with 2 or 4 lanes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Philox<W, const K: usize, const R: usize = 10>(PhantomData<W>);

/// Philox 2x32, 10 rounds.
pub type Philox2x32 = Philox<u32, 2>;
/// Philox 4x32, 10 rounds.
pub type Philox4x32 = Philox<u32, 4>;
/// Philox 2x64, 10 rounds.
pub type Philox2x64 = Philox<u64, 2>;
/// Philox 4x64, 10 rounds.
pub type Philox4x64 = Philox<u64, 4>;

/// Multiplier and Weyl constants of a Philox shape.
///
/// Two-word shapes use only the first entry of each slice.
pub trait PhiloxParams: Cbrng {
    /// Round multipliers, applied to words 0 and 2.
    const MULTIPLIERS: &'static [Self::Word];
    /// Round-key increments.
    const WEYL: &'static [Self::Word];
}

/// Applies `rounds` two-word Philox rounds to `x`.
#[inline(always)]
pub fn philox2_rounds<W: Word>(key: W, x: &mut [W; 2], multiplier: W, weyl: W, rounds: usize) {
    let mut k = key;
    for round in 0..rounds {
        if round > 0 {
            k = k.wrapping_add(&weyl);
        }
        let (hi, lo) = x[0].mulhilo(multiplier);
        *x = [hi ^ k ^ x[1], lo];
    }
}

/// Applies `rounds` four-word Philox rounds to `x`.
#[inline(always)]
pub fn philox4_rounds<W: Word>(
    key: [W; 2],
    x: &mut [W; 4],
    multipliers: [W; 2],
    weyl: [W; 2],
    rounds: usize,
) {
    let [mut k0, mut k1] = key;
    for round in 0..rounds {
        if round > 0 {
            k0 = k0.wrapping_add(&weyl[0]);
            k1 = k1.wrapping_add(&weyl[1]);
        }
        let (hi0, lo0) = x[0].mulhilo(multipliers[0]);
        let (hi1, lo1) = x[2].mulhilo(multipliers[1]);
        *x = [hi1 ^ x[1] ^ k0, lo1, hi0 ^ x[3] ^ k1, lo0];
    }
}

macro_rules! philox2 {
    ($word:ty, $name:literal, $mul:expr, $weyl:expr) => {
        impl<const R: usize> PhiloxParams for Philox<$word, 2, R> {
            const MULTIPLIERS: &'static [$word] = &[$mul];
            const WEYL: &'static [$word] = &[$weyl];
        }

        impl<const R: usize> Cbrng for Philox<$word, 2, R> {
            type Word = $word;
            type Key = [$word; 1];
            type Block = [$word; 2];
            type Schedule = [$word; 1];

            const NAME: &'static str = $name;
            const FAMILY: Family = Family::Philox;
            const ROUNDS: usize = {
                assert!(R > 0, "Philox needs at least one round");
                R
            };

            #[inline]
            fn schedule(key: &[$word; 1]) -> [$word; 1] {
                *key
            }

            #[inline]
            fn encrypt(schedule: &[$word; 1], block: &mut [$word; 2]) {
                philox2_rounds(schedule[0], block, $mul, $weyl, Self::ROUNDS);
            }
        }
    };
}

macro_rules! philox4 {
    ($word:ty, $name:literal, [$m0:expr, $m1:expr], [$w0:expr, $w1:expr]) => {
        impl<const R: usize> PhiloxParams for Philox<$word, 4, R> {
            const MULTIPLIERS: &'static [$word] = &[$m0, $m1];
            const WEYL: &'static [$word] = &[$w0, $w1];
        }

        impl<const R: usize> Cbrng for Philox<$word, 4, R> {
            type Word = $word;
            type Key = [$word; 2];
            type Block = [$word; 4];
            type Schedule = [$word; 2];

            const NAME: &'static str = $name;
            const FAMILY: Family = Family::Philox;
            const ROUNDS: usize = {
                assert!(R > 0, "Philox needs at least one round");
                R
            };

            #[inline]
            fn schedule(key: &[$word; 2]) -> [$word; 2] {
                *key
            }

            #[inline]
            fn encrypt(schedule: &[$word; 2], block: &mut [$word; 4]) {
                philox4_rounds(*schedule, block, [$m0, $m1], [$w0, $w1], Self::ROUNDS);
            }
        }
    };
}

philox2!(u32, "philox2x32", 0xD256_D193, 0x9E37_79B9);
philox4!(
    u32,
    "philox4x32",
    [0xD251_1F53, 0xCD9E_8D57],
    [0x9E37_79B9, 0xBB67_AE85]
);
philox2!(u64, "philox2x64", 0xD2B7_4407_B1CE_6E93, 0x9E37_79B9_7F4A_7C15);
philox4!(
    u64,
    "philox4x64",
    [0xD2E7_470E_E14C_6C93, 0xCA5A_8263_9512_1157],
    [0x9E37_79B9_7F4A_7C15, 0xBB67_AE85_84CA_A73B]
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_round_is_raw_multiply() {
        let out = Philox::<u32, 2, 1>::generate(&[0], &[1, 0]);
        assert_eq!(out, [0, 0xD256_D193]);
    }

    #[test]
    fn test_zero_key_zero_counter_philox2x32() {
        assert_eq!(Philox2x32::generate(&[0], &[0, 0]), [0xff1dae59, 0x6cd10df2]);
    }

    #[test]
    fn test_rounds_change_output() {
        let ten = Philox4x64::generate(&[1, 2], &[3, 4, 5, 6]);
        let seven = Philox::<u64, 4, 7>::generate(&[1, 2], &[3, 4, 5, 6]);
        assert_ne!(ten, seven);
    }

    #[test]
    fn test_params_exposed() {
        assert_eq!(Philox4x32::MULTIPLIERS, &[0xD251_1F53, 0xCD9E_8D57]);
        assert_eq!(Philox2x64::WEYL, &[0x9E37_79B9_7F4A_7C15]);
    }
}
