//! Immutable generator key.

use super::error::{CbrngError, Result};
use super::word::{Word, WordArray};

/// Fixed-size key of an algorithm.
///
/// A key is fixed at construction; generators replace it wholesale on an
/// explicit reseed and never mutate it while producing output.
///
/// # Examples
/// ```
/// use cbrng_core::types::Key;
///
/// let key = Key::<[u32; 2]>::from_seed(0x0123_4567_89AB_CDEF);
/// assert_eq!(key.words(), &[0x89AB_CDEF, 0x0123_4567]);
/// assert_eq!(Key::<[u32; 2]>::from_bytes(&key.to_bytes()).unwrap(), key);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Key<B> {
    words: B,
}

impl<B: WordArray> Default for Key<B> {
    fn default() -> Self {
        Self::new(B::zeroed())
    }
}

impl<B: WordArray> From<B> for Key<B> {
    fn from(words: B) -> Self {
        Self::new(words)
    }
}

impl<B: WordArray> Key<B> {
    /// Wraps the given words.
    #[inline]
    pub fn new(words: B) -> Self {
        Self { words }
    }

    /// Places the little-endian bytes of `seed` at the start of the key,
    /// zero-filling the rest.
    ///
    /// Keys shorter than eight bytes keep only the low bytes of the seed.
    pub fn from_seed(seed: u64) -> Self {
        Self::from_prefix(&seed.to_le_bytes())
    }

    /// Builds a key whose byte layout starts with `bytes`, truncated or
    /// zero-filled to the key size.
    pub fn from_prefix(bytes: &[u8]) -> Self {
        let mut padded = vec![0u8; B::BYTES];
        let n = bytes.len().min(padded.len());
        padded[..n].copy_from_slice(&bytes[..n]);
        let mut words = B::zeroed();
        for (word, chunk) in words
            .as_mut_slice()
            .iter_mut()
            .zip(padded.chunks_exact(<B::Word as Word>::BYTES))
        {
            *word = <B::Word as Word>::from_le_slice(chunk);
        }
        Self::new(words)
    }

    /// Parses the little-endian byte layout.
    ///
    /// # Errors
    /// [`CbrngError::InvalidKeyLength`] unless `bytes.len() == B::BYTES`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        B::from_le_bytes(bytes)
            .map(Self::new)
            .ok_or(CbrngError::InvalidKeyLength {
                expected: B::BYTES,
                actual: bytes.len(),
            })
    }

    /// Little-endian byte layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.words.to_le_bytes()
    }

    /// Key words.
    #[inline]
    pub fn words(&self) -> &B {
        &self.words
    }
}
