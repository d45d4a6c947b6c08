//! Round kernels and algorithm descriptors.
//!
//! Every algorithm is a zero-sized marker type implementing [`Cbrng`]. The
//! trait fixes the word type, key shape, block shape and round count at
//! compile time, and provides the portable scalar kernel that acts as the
//! reference for all vectorised backends.
//!
//! | Family | Variants | Default rounds |
//! |--------|----------|----------------|
//! | Philox | 2x32, 4x32, 2x64, 4x64 | 10 |
//! | Threefry | 2x32, 4x32, 2x64, 4x64, 8x64, 16x64 | 20 |
//! | Threefish | 256, 512, 1024 | 72, 72, 80 |
//! | AES | 128, 192, 256 | 10, 12, 14 |
//! | ARS | 4x32 | 5 |
//!
//! Round counts are const parameters; a zero round count fails to compile
//! when the algorithm is first used.

pub mod aes;
pub mod philox;
pub mod threefry;

pub use aes::{Aes128, Aes192, Aes256, AesFamily, Ars, RoundKeys, MAX_ROUND_KEYS};
pub use philox::{Philox, Philox2x32, Philox2x64, Philox4x32, Philox4x64, PhiloxParams};
pub use threefry::{
    Threefish1024, Threefish256, Threefish512, Threefry, Threefry16x64, Threefry2x32,
    Threefry2x64, Threefry4x32, Threefry4x64, Threefry8x64, ThreefryParams, ThreefrySchedule,
};

use crate::types::{Word, WordArray};
use std::fmt;

/// Algorithm family, used to decide which backends can serve an algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Family {
    /// Multiply-high/low rounds.
    Philox,
    /// Add/rotate/XOR rounds.
    Threefry,
    /// FIPS-197 AES.
    Aes,
    /// AES rounds with a Weyl key schedule.
    Ars,
}

impl Family {
    /// Returns `true` for families built on the AES round function.
    pub fn uses_aes_round(&self) -> bool {
        matches!(self, Family::Aes | Family::Ars)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Family::Philox => "philox",
            Family::Threefry => "threefry",
            Family::Aes => "aes",
            Family::Ars => "ars",
        };
        f.write_str(name)
    }
}

/// A counter-based generator: a keyed bijection on fixed-size blocks.
///
/// Implementors are zero-sized markers. [`Cbrng::schedule`] expands a key
/// once; [`Cbrng::encrypt`] maps one counter block to one output block and
/// is the scalar reference every backend must reproduce bit for bit.
///
/// # Examples
/// ```
/// use cbrng_core::kernels::{Cbrng, Philox4x32};
///
/// let out = Philox4x32::generate(&[0, 0], &[0, 0, 0, 0]);
/// assert_eq!(out, [0x6627e8d5, 0xe169c58d, 0xbc57ac4c, 0x9b00dbd8]);
/// ```
pub trait Cbrng: Copy + Default + fmt::Debug + Send + Sync + 'static {
    /// Word type of keys, counters and blocks.
    type Word: Word;
    /// Key shape.
    type Key: WordArray<Word = Self::Word>;
    /// Counter and output block shape.
    type Block: WordArray<Word = Self::Word>;
    /// Expanded key used by the kernels.
    type Schedule: Clone + fmt::Debug + PartialEq + Send + Sync + 'static;

    /// Lower-case algorithm name, e.g. `"philox4x32"`.
    const NAME: &'static str;
    /// Algorithm family.
    const FAMILY: Family;
    /// Number of rounds applied per block.
    const ROUNDS: usize;

    /// Expands a key into the form consumed by [`Cbrng::encrypt`].
    fn schedule(key: &Self::Key) -> Self::Schedule;

    /// Replaces `block` with its image under the keyed round function.
    fn encrypt(schedule: &Self::Schedule, block: &mut Self::Block);

    /// One-shot convenience: the output block for `(key, counter)`.
    fn generate(key: &Self::Key, counter: &Self::Block) -> Self::Block {
        let mut block = *counter;
        Self::encrypt(&Self::schedule(key), &mut block);
        block
    }

    /// Number of words in one block.
    fn block_words() -> usize {
        <Self::Block as WordArray>::LEN
    }
}
