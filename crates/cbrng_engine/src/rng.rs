//! `rand` adaptor: a word stream over a [`CounterEngine`].
//!
//! [`CounterRng`] buffers one block and hands out its words in order, so the
//! word sequence is the concatenation of the engine's blocks. Bulk requests
//! through [`CounterRng::fill_words`] go through the batched kernel,
//! [`CounterEngine::batch_blocks`] blocks per call.
//!
//! # Examples
//!
//! ```rust
//! use cbrng_core::kernels::Philox4x32;
//! use cbrng_engine::{CounterEngine, CounterRng};
//! use rand::{Rng, SeedableRng};
//!
//! let mut rng = CounterRng::<Philox4x32>::seed_from_u64(42);
//! let x: f64 = rng.gen();
//! assert!((0.0..1.0).contains(&x));
//!
//! let mut engine = CounterEngine::<Philox4x32>::from_seed(42);
//! let mut again = CounterRng::new(engine.clone());
//! let block = engine.next_block();
//! assert_eq!(again.next_word(), block[0]);
//! ```

use crate::backend::Backends;
use crate::engine::CounterEngine;
use cbrng_core::{Key, Word, WordArray};
use rand::{RngCore, SeedableRng};

/// Word-at-a-time generator implementing [`RngCore`].
#[derive(Clone, Debug)]
pub struct CounterRng<A: Backends> {
    engine: CounterEngine<A>,
    buffer: A::Block,
    /// Next unread word of `buffer`; `A::Block::LEN` when empty.
    index: usize,
    /// Reused output of bulk kernel calls.
    scratch: Vec<A::Block>,
}

impl<A: Backends> CounterRng<A> {
    /// Wraps `engine`; the first word is word 0 of its next block.
    pub fn new(engine: CounterEngine<A>) -> Self {
        Self {
            engine,
            buffer: A::Block::zeroed(),
            index: A::Block::LEN,
            scratch: Vec::new(),
        }
    }

    /// The underlying engine. Its counter is past any buffered block.
    #[inline]
    pub fn engine(&self) -> &CounterEngine<A> {
        &self.engine
    }

    /// Unwraps the engine, dropping buffered words.
    pub fn into_engine(self) -> CounterEngine<A> {
        self.engine
    }

    /// Words still buffered from the last block.
    #[inline]
    pub fn buffered(&self) -> usize {
        A::Block::LEN - self.index
    }

    /// The next word of the stream.
    #[inline]
    pub fn next_word(&mut self) -> A::Word {
        if self.index == A::Block::LEN {
            self.buffer = self.engine.next_block();
            self.index = 0;
        }
        let word = self.buffer.as_slice()[self.index];
        self.index += 1;
        word
    }

    /// Fills `out` with the next words of the stream.
    pub fn fill_words(&mut self, out: &mut [A::Word]) {
        let lead = self.buffered().min(out.len());
        let (head, rest) = out.split_at_mut(lead);
        for word in head {
            *word = self.next_word();
        }

        let batch = self.engine.batch_blocks().max(1);
        let whole = rest.len() / A::Block::LEN;
        if self.scratch.len() < batch.min(whole) {
            self.scratch.resize(batch.min(whole), A::Block::zeroed());
        }
        let (full, tail) = rest.split_at_mut(whole * A::Block::LEN);
        for chunk in full.chunks_mut(A::Block::LEN * batch) {
            let blocks = &mut self.scratch[..chunk.len() / A::Block::LEN];
            self.engine.next_blocks(blocks);
            copy_words::<A>(blocks, chunk);
        }
        for word in tail {
            *word = self.next_word();
        }
    }

    /// Skips `n` words, crossing block boundaries without generating the
    /// skipped blocks.
    pub fn discard_words(&mut self, n: u64) {
        let buffered = self.buffered() as u64;
        if n <= buffered {
            self.index += n as usize;
            return;
        }
        let n = n - buffered;
        let len = A::Block::LEN as u64;
        self.engine.discard(n / len);
        self.index = A::Block::LEN;
        let rem = (n % len) as usize;
        if rem > 0 {
            self.buffer = self.engine.next_block();
            self.index = rem;
        }
    }
}

fn copy_words<A: Backends>(blocks: &[A::Block], out: &mut [A::Word]) {
    for (block, chunk) in blocks.iter().zip(out.chunks_exact_mut(A::Block::LEN)) {
        chunk.copy_from_slice(block.as_slice());
    }
}

impl<A: Backends> From<CounterEngine<A>> for CounterRng<A> {
    fn from(engine: CounterEngine<A>) -> Self {
        Self::new(engine)
    }
}

impl<A: Backends> RngCore for CounterRng<A> {
    /// Low 32 bits of the next word.
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.next_word().to_u128() as u32
    }

    /// On 32-bit generators, two words with the first in the low half.
    #[inline]
    fn next_u64(&mut self) -> u64 {
        if <A::Word as Word>::BITS == 32 {
            let lo = self.next_word().to_u128() as u64;
            let hi = self.next_word().to_u128() as u64;
            (hi << 32) | lo
        } else {
            self.next_word().to_u128() as u64
        }
    }

    /// Little-endian bytes of consecutive words; a partly used final word
    /// is dropped.
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let width = <A::Word as Word>::BYTES;
        let mut chunks = dest.chunks_exact_mut(width);
        for chunk in &mut chunks {
            self.next_word().write_le(chunk);
        }
        let tail = chunks.into_remainder();
        if !tail.is_empty() {
            let mut bytes = [0u8; 8];
            self.next_word().write_le(&mut bytes);
            let n = tail.len();
            tail.copy_from_slice(&bytes[..n]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl<A: Backends> SeedableRng for CounterRng<A> {
    /// Leading key bytes; longer keys are zero-filled, shorter ones keep
    /// the prefix.
    type Seed = [u8; 32];

    fn from_seed(seed: Self::Seed) -> Self {
        let key = Key::<A::Key>::from_prefix(&seed);
        Self::new(CounterEngine::new(*key.words()))
    }

    /// Same stream as [`CounterEngine::from_seed`].
    fn seed_from_u64(state: u64) -> Self {
        Self::new(CounterEngine::from_seed(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineConfig, DEFAULT_BATCH_BLOCKS};
    use cbrng_core::kernels::{Philox2x64, Philox4x32, Threefry4x64};

    #[test]
    fn test_words_follow_block_order() {
        let mut engine = CounterEngine::<Philox4x32>::new([3, 4]);
        let mut rng = CounterRng::new(engine.clone());
        for _ in 0..3 {
            let block = engine.next_block();
            for word in block {
                assert_eq!(rng.next_word(), word);
            }
        }
    }

    #[test]
    fn test_next_u64_low_word_first() {
        let mut engine = CounterEngine::<Philox4x32>::new([1, 0]);
        let mut rng = CounterRng::new(engine.clone());
        let block = engine.next_block();
        assert_eq!(
            rng.next_u64(),
            (block[1] as u64) << 32 | block[0] as u64
        );
    }

    #[test]
    fn test_next_u64_on_wide_words() {
        let mut engine = CounterEngine::<Philox2x64>::new([9]);
        let mut rng = CounterRng::new(engine.clone());
        let block = engine.next_block();
        assert_eq!(rng.next_u64(), block[0]);
        assert_eq!(rng.next_u32(), block[1] as u32);
    }

    #[test]
    fn test_fill_bytes_little_endian() {
        let mut engine = CounterEngine::<Philox4x32>::new([5, 6]);
        let mut rng = CounterRng::new(engine.clone());
        let block = engine.next_block();
        let mut bytes = [0u8; 6];
        rng.fill_bytes(&mut bytes);
        assert_eq!(bytes[..4], block[0].to_le_bytes());
        assert_eq!(bytes[4..], block[1].to_le_bytes()[..2]);
        assert_eq!(rng.next_word(), block[2]);
    }

    #[test]
    fn test_fill_words_matches_single_words() {
        let engine = CounterEngine::<Threefry4x64>::new([1, 2, 3, 4]);
        let mut bulk = CounterRng::new(engine.clone());
        let mut single = CounterRng::new(engine);

        bulk.next_word();
        single.next_word();
        let mut out = vec![0u64; 4 * DEFAULT_BATCH_BLOCKS + 7];
        bulk.fill_words(&mut out);
        for &word in &out {
            assert_eq!(word, single.next_word());
        }
        assert_eq!(bulk.next_word(), single.next_word());
    }

    #[test]
    fn test_fill_words_honours_batch_size() {
        let config = EngineConfig::builder().seed(11).batch_blocks(3).build().unwrap();
        let engine = CounterEngine::<Philox4x32>::from_config(&config).unwrap();
        let mut bulk = CounterRng::new(engine.clone());
        let mut single = CounterRng::new(engine);

        let mut out = vec![0u32; 4 * 10 + 2];
        bulk.fill_words(&mut out);
        assert!(bulk.scratch.len() <= 3);
        for &word in &out {
            assert_eq!(word, single.next_word());
        }
        assert_eq!(bulk.engine(), single.engine());
    }

    #[test]
    fn test_discard_words_matches_reading() {
        for n in [0u64, 1, 3, 4, 5, 17, 100] {
            let engine = CounterEngine::<Philox4x32>::new([8, 8]);
            let mut skipped = CounterRng::new(engine.clone());
            let mut read = CounterRng::new(engine);
            skipped.next_word();
            read.next_word();
            skipped.discard_words(n);
            for _ in 0..n {
                read.next_word();
            }
            assert_eq!(skipped.next_word(), read.next_word(), "n = {}", n);
        }
    }

    #[test]
    fn test_seed_from_u64_matches_engine() {
        let mut rng = CounterRng::<Philox4x32>::seed_from_u64(99);
        let mut engine = CounterEngine::<Philox4x32>::from_seed(99);
        assert_eq!(rng.next_word(), engine.next_block()[0]);
    }

    #[test]
    fn test_from_seed_uses_prefix() {
        let mut seed = [0u8; 32];
        seed[0] = 1;
        seed[4] = 2;
        let rng = CounterRng::<Philox4x32>::from_seed(seed);
        assert_eq!(rng.engine().key().words(), &[1, 2]);
    }
}
