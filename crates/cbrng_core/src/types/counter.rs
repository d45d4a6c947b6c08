//! Multi-word counter with modular increment.
//!
//! A [`Counter`] is a fixed array of words read as one unsigned integer in
//! little-endian word order: word 0 is least significant. Every increment
//! wraps modulo `2^(LEN * BITS)`, so overflow is never an error.

use super::error::{CbrngError, Result};
use super::word::{Word, WordArray};
use num_traits::WrappingAdd;

/// Counter register shaped like the algorithm's output block.
///
/// # Examples
/// ```
/// use cbrng_core::types::Counter;
///
/// let mut ctr = Counter::new([u32::MAX, 0]);
/// ctr.increment();
/// assert_eq!(ctr.words(), &[0, 1]);
///
/// let mut top = Counter::<[u32; 2]>::max();
/// top.increment();
/// assert!(top.is_zero());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Counter<B> {
    words: B,
}

impl<B: WordArray> Default for Counter<B> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<B: WordArray> From<B> for Counter<B> {
    fn from(words: B) -> Self {
        Self::new(words)
    }
}

impl<B: WordArray> Counter<B> {
    /// Wraps the given words, word 0 least significant.
    #[inline]
    pub fn new(words: B) -> Self {
        Self { words }
    }

    /// Counter with value zero.
    #[inline]
    pub fn zero() -> Self {
        Self::new(B::zeroed())
    }

    /// Counter with every bit set.
    #[inline]
    pub fn max() -> Self {
        Self::new(B::splat(<B::Word as Word>::MAX))
    }

    /// Parses the little-endian byte layout.
    ///
    /// # Errors
    /// [`CbrngError::InvalidCounterLength`] unless `bytes.len() == B::BYTES`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        B::from_le_bytes(bytes)
            .map(Self::new)
            .ok_or(CbrngError::InvalidCounterLength {
                expected: B::BYTES,
                actual: bytes.len(),
            })
    }

    /// Replaces the value from its little-endian byte layout.
    ///
    /// The counter is left unchanged on error.
    pub fn set_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        *self = Self::from_bytes(bytes)?;
        Ok(())
    }

    /// Little-endian byte layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.words.to_le_bytes()
    }

    /// Words, least significant first.
    #[inline]
    pub fn words(&self) -> &B {
        &self.words
    }

    /// Copy of the words.
    #[inline]
    pub fn value(&self) -> B {
        self.words
    }

    /// Overwrites the words.
    #[inline]
    pub fn set(&mut self, words: B) {
        self.words = words;
    }

    /// Returns `true` when every word is zero.
    pub fn is_zero(&self) -> bool {
        self.words.as_slice().iter().all(|w| *w == <B::Word as Word>::ZERO)
    }

    /// Adds one, carrying from word 0 upward and wrapping at the top.
    #[inline]
    pub fn increment(&mut self) {
        for word in self.words.as_mut_slice() {
            *word = word.wrapping_add(&<B::Word as Word>::ONE);
            if *word != <B::Word as Word>::ZERO {
                return;
            }
        }
    }

    /// Adds `n` modulo the full counter width.
    ///
    /// `n` is split into words least significant first; counters narrower
    /// than 128 bits drop the excess high bits of `n`, which is exactly
    /// reduction modulo the counter range.
    #[inline]
    pub fn increment_by(&mut self, n: u128) {
        let bits = <B::Word as Word>::BITS;
        let mask = <B::Word as Word>::MAX.to_u128();
        let mut rest = n;
        let mut carry = 0u128;
        for word in self.words.as_mut_slice() {
            if rest == 0 && carry == 0 {
                return;
            }
            let sum = word.to_u128() + (rest & mask) + carry;
            *word = <B::Word as Word>::from_u128_truncating(sum);
            carry = sum >> bits;
            rest >>= bits;
        }
    }

    /// Advances by one block: the block's word count.
    #[inline]
    pub fn increment_block(&mut self) {
        self.increment_by(B::LEN as u128);
    }

    /// Advances by `n` blocks.
    #[inline]
    pub fn increment_blocks(&mut self, n: u64) {
        self.increment_by(n as u128 * B::LEN as u128);
    }

    /// Writes the current value and its successors into `out`, one block
    /// apart, then leaves `self` just past the last one written.
    ///
    /// This is the lane layout step of the batched kernels: `out[i]` is the
    /// counter of the `i`th block in sequence.
    #[inline]
    pub fn fill_sequence(&mut self, out: &mut [B]) {
        for slot in out {
            *slot = self.words;
            self.increment_block();
        }
    }
}
