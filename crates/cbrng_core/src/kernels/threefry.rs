//! Threefry: add/rotate/XOR rounds with periodic subkey injection.
//!
//! Threefry is the Threefish block cipher with zero tweak and a
//! configurable round count. The key schedule appends one parity word to
//! the key; every fourth round a rotated window of the schedule is added to
//! the state.
//!
//! # Round structure (round `n`, 1-based)
//!
//! 1. For each word pair `(2j, 2j+1)`: `x[2j] += x[2j+1]`, then
//!    `x[2j+1] = rotl(x[2j+1], ROT[j][(n-1) % 8]) ^ x[2j]`.
//! 2. Permute words: `x[i] = x_old[PERM[i]]`.
//! 3. If `n % 4 == 0`, inject subkey `n / 4`.
//!
//! Subkey `s` is also injected once before the first round (`s = 0`):
//! `x[i] += ks[(s + i) % (K + 1)]`, and the last word additionally gets `+ s`.
//!
//! Running 72 rounds of the 4x64 and 8x64 shapes and 80 rounds of the
//! 16x64 shape gives Threefish-256/512/1024 with a zero tweak.

use super::{Cbrng, Family};
use crate::types::Word;
use std::marker::PhantomData;

/// Threefry generator over `K` words of type `W` with `R` rounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Threefry<W, const K: usize, const R: usize = 20>(PhantomData<W>);

/// Threefry 2x32, 20 rounds.
pub type Threefry2x32 = Threefry<u32, 2>;
/// Threefry 4x32, 20 rounds.
pub type Threefry4x32 = Threefry<u32, 4>;
/// Threefry 2x64, 20 rounds.
pub type Threefry2x64 = Threefry<u64, 2>;
/// Threefry 4x64, 20 rounds.
pub type Threefry4x64 = Threefry<u64, 4>;
/// Threefry 8x64, 20 rounds.
pub type Threefry8x64 = Threefry<u64, 8>;
/// Threefry 16x64, 20 rounds.
pub type Threefry16x64 = Threefry<u64, 16>;
/// Threefish-256: Threefry 4x64 with 72 rounds.
pub type Threefish256 = Threefry<u64, 4, 72>;
/// Threefish-512: Threefry 8x64 with 72 rounds.
pub type Threefish512 = Threefry<u64, 8, 72>;
/// Threefish-1024: Threefry 16x64 with 80 rounds.
pub type Threefish1024 = Threefry<u64, 16, 80>;

const PARITY32: u32 = 0x1BD1_1BDA;
const PARITY64: u64 = 0x1BD1_1BDA_A9FC_1A22;

const ROTATIONS_2X32: [[u32; 8]; 1] = [[13, 15, 26, 6, 17, 29, 16, 24]];
const ROTATIONS_4X32: [[u32; 8]; 2] = [
    [10, 11, 13, 23, 6, 17, 25, 18],
    [26, 21, 27, 5, 20, 11, 10, 20],
];
const ROTATIONS_2X64: [[u32; 8]; 1] = [[16, 42, 12, 31, 16, 32, 24, 21]];
const ROTATIONS_4X64: [[u32; 8]; 2] = [
    [14, 52, 23, 5, 25, 46, 58, 32],
    [16, 57, 40, 37, 33, 12, 22, 32],
];
const ROTATIONS_8X64: [[u32; 8]; 4] = [
    [46, 33, 17, 44, 39, 13, 25, 8],
    [36, 27, 49, 9, 30, 50, 29, 35],
    [19, 14, 36, 54, 34, 10, 39, 56],
    [37, 42, 39, 56, 24, 17, 43, 22],
];
const ROTATIONS_16X64: [[u32; 8]; 8] = [
    [24, 38, 33, 5, 41, 16, 31, 9],
    [13, 19, 4, 20, 9, 34, 44, 48],
    [8, 10, 51, 48, 37, 56, 47, 35],
    [47, 55, 13, 41, 31, 51, 46, 52],
    [8, 49, 34, 47, 12, 4, 19, 23],
    [17, 18, 41, 28, 47, 53, 42, 31],
    [22, 23, 59, 16, 44, 42, 44, 37],
    [37, 52, 17, 25, 30, 41, 25, 20],
];

const PERMUTATION_2: [usize; 2] = [0, 1];
const PERMUTATION_4: [usize; 4] = [0, 3, 2, 1];
const PERMUTATION_8: [usize; 8] = [2, 1, 4, 7, 6, 5, 0, 3];
const PERMUTATION_16: [usize; 16] = [0, 9, 2, 13, 6, 11, 4, 15, 10, 7, 12, 3, 14, 5, 8, 1];

/// Rotation and permutation tables of a Threefry shape.
pub trait ThreefryParams: Cbrng {
    /// `ROTATIONS[j][(n-1) % 8]` is the rotation of word pair `j` in round `n`.
    const ROTATIONS: &'static [[u32; 8]];
    /// Word permutation applied after each round.
    const PERMUTATION: &'static [usize];
}

/// Threefry key schedule: the key plus its parity word.
///
/// # Examples
/// ```
/// use cbrng_core::kernels::ThreefrySchedule;
///
/// let ks = ThreefrySchedule::new([1u32, 2], 0x1BD1_1BDA);
/// assert_eq!(ks.subkey(2), 0x1BD1_1BDA ^ 1 ^ 2);
/// // Injection 1 starts one word further into the schedule and adds 1 to the last word.
/// assert_eq!(ks.injection(1), [2, (0x1BD1_1BDA ^ 1 ^ 2) + 1]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ThreefrySchedule<W, const K: usize> {
    key: [W; K],
    parity: W,
}

impl<W: Word, const K: usize> ThreefrySchedule<W, K> {
    /// Builds the schedule, folding every key word into `parity_constant`.
    pub fn new(key: [W; K], parity_constant: W) -> Self {
        let parity = key.iter().fold(parity_constant, |acc, &k| acc ^ k);
        Self { key, parity }
    }

    /// Schedule word `i` for `i` in `0..=K`.
    #[inline(always)]
    pub fn subkey(&self, i: usize) -> W {
        if i < K {
            self.key[i]
        } else {
            self.parity
        }
    }

    /// Words added to the state at injection number `s`.
    #[inline(always)]
    pub fn injection(&self, s: usize) -> [W; K] {
        let mut words = [W::ZERO; K];
        for (i, word) in words.iter_mut().enumerate() {
            *word = self.subkey((s + i) % (K + 1));
        }
        words[K - 1] = words[K - 1].wrapping_add(&W::from_u128_truncating(s as u128));
        words
    }
}

#[inline(always)]
fn inject<W: Word, const K: usize>(x: &mut [W; K], schedule: &ThreefrySchedule<W, K>, s: usize) {
    for (word, add) in x.iter_mut().zip(schedule.injection(s)) {
        *word = word.wrapping_add(&add);
    }
}

/// Applies `rounds` Threefry rounds, including the initial and periodic
/// subkey injections.
#[inline(always)]
pub fn threefry_rounds<W: Word, const K: usize>(
    schedule: &ThreefrySchedule<W, K>,
    x: &mut [W; K],
    rounds: usize,
    rotations: &[[u32; 8]],
    permutation: &[usize],
) {
    inject(x, schedule, 0);
    for n in 1..=rounds {
        let column = (n - 1) % 8;
        for (j, rotation) in rotations.iter().enumerate() {
            let (a, b) = (2 * j, 2 * j + 1);
            x[a] = x[a].wrapping_add(&x[b]);
            x[b] = x[b].rotate_left(rotation[column]) ^ x[a];
        }
        let previous = *x;
        for (word, &source) in x.iter_mut().zip(permutation) {
            *word = previous[source];
        }
        if n % 4 == 0 {
            inject(x, schedule, n / 4);
        }
    }
}

macro_rules! threefry {
    ($word:ty, $k:literal, $parity:expr, $rot:expr, $perm:expr, $name:ident) => {
        impl<const R: usize> ThreefryParams for Threefry<$word, $k, R> {
            const ROTATIONS: &'static [[u32; 8]] = &$rot;
            const PERMUTATION: &'static [usize] = &$perm;
        }

        impl<const R: usize> Cbrng for Threefry<$word, $k, R> {
            type Word = $word;
            type Key = [$word; $k];
            type Block = [$word; $k];
            type Schedule = ThreefrySchedule<$word, $k>;

            const NAME: &'static str = $name(R);
            const FAMILY: Family = Family::Threefry;
            const ROUNDS: usize = {
                assert!(R > 0, "Threefry needs at least one round");
                R
            };

            #[inline]
            fn schedule(key: &[$word; $k]) -> ThreefrySchedule<$word, $k> {
                ThreefrySchedule::new(*key, $parity)
            }

            #[inline]
            fn encrypt(schedule: &ThreefrySchedule<$word, $k>, block: &mut [$word; $k]) {
                threefry_rounds(schedule, block, Self::ROUNDS, &$rot, &$perm);
            }
        }
    };
}

const fn name_2x32(_: usize) -> &'static str {
    "threefry2x32"
}

const fn name_4x32(_: usize) -> &'static str {
    "threefry4x32"
}

const fn name_2x64(_: usize) -> &'static str {
    "threefry2x64"
}

const fn name_4x64(rounds: usize) -> &'static str {
    if rounds == 72 {
        "threefish256"
    } else {
        "threefry4x64"
    }
}

const fn name_8x64(rounds: usize) -> &'static str {
    if rounds == 72 {
        "threefish512"
    } else {
        "threefry8x64"
    }
}

const fn name_16x64(rounds: usize) -> &'static str {
    if rounds == 80 {
        "threefish1024"
    } else {
        "threefry16x64"
    }
}

threefry!(u32, 2, PARITY32, ROTATIONS_2X32, PERMUTATION_2, name_2x32);
threefry!(u32, 4, PARITY32, ROTATIONS_4X32, PERMUTATION_4, name_4x32);
threefry!(u64, 2, PARITY64, ROTATIONS_2X64, PERMUTATION_2, name_2x64);
threefry!(u64, 4, PARITY64, ROTATIONS_4X64, PERMUTATION_4, name_4x64);
threefry!(u64, 8, PARITY64, ROTATIONS_8X64, PERMUTATION_8, name_8x64);
threefry!(u64, 16, PARITY64, ROTATIONS_16X64, PERMUTATION_16, name_16x64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permutations_are_bijections() {
        for perm in [
            &PERMUTATION_2[..],
            &PERMUTATION_4[..],
            &PERMUTATION_8[..],
            &PERMUTATION_16[..],
        ] {
            let mut seen = perm.to_vec();
            seen.sort_unstable();
            assert_eq!(seen, (0..perm.len()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_rotation_table_shapes() {
        assert_eq!(Threefry16x64::ROTATIONS.len(), 8);
        assert_eq!(Threefry8x64::PERMUTATION.len(), 8);
        assert_eq!(Threefry2x32::ROTATIONS.len(), 1);
    }

    #[test]
    fn test_initial_injection_adds_key() {
        let ks = ThreefrySchedule::new([5u64, 7], PARITY64);
        let mut x = [0u64, 0];
        inject(&mut x, &ks, 0);
        assert_eq!(x, [5, 7]);
    }

    #[test]
    fn test_threefish_names() {
        assert_eq!(Threefish256::NAME, "threefish256");
        assert_eq!(Threefish1024::NAME, "threefish1024");
        assert_eq!(Threefry4x64::NAME, "threefry4x64");
        assert_eq!(Threefish512::ROUNDS, 72);
    }

    #[test]
    fn test_threefry2x32_zero_vector() {
        assert_eq!(
            Threefry2x32::generate(&[0, 0], &[0, 0]),
            [0x6b200159, 0x99ba4efe]
        );
    }
}
