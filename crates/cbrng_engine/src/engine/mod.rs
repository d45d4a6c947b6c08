//! Counter engine: one key, one counter and a bound kernel.
//!
//! [`CounterEngine`] is the stateful face of a stateless algorithm. Each
//! block it produces is the encryption of the current counter, after which
//! the counter advances by one block (the block's word count). The kernel is
//! resolved once at construction and stored as a plain function pointer, so
//! generation never re-checks the CPU.
//!
//! # Examples
//!
//! ```rust
//! use cbrng_core::kernels::{Cbrng, Philox4x32};
//! use cbrng_engine::CounterEngine;
//!
//! let mut engine = CounterEngine::<Philox4x32>::new([1, 2]);
//! let first = engine.next_block();
//! assert_eq!(first, Philox4x32::generate(&[1, 2], &[0, 0, 0, 0]));
//! assert_eq!(engine.counter().value(), [4, 0, 0, 0]);
//!
//! let mut batch = [[0u32; 4]; 16];
//! engine.next_blocks(&mut batch);
//! assert_eq!(batch[0], Philox4x32::generate(&[1, 2], &[4, 0, 0, 0]));
//! ```

mod config;
mod state;

pub use config::{
    ConfigError, EngineConfig, EngineConfigBuilder, DEFAULT_BATCH_BLOCKS, MAX_BATCH_BLOCKS,
};
pub use state::EngineState;

use crate::backend::{self, Backends, BatchFn};
use crate::dispatch::{select_backend, BackendKind};
use cbrng_core::{CbrngError, Counter, Key, Result, WordArray};
use std::fmt;
use tracing::debug;

/// Stateful generator over algorithm `A`.
#[derive(Clone)]
pub struct CounterEngine<A: Backends> {
    key: Key<A::Key>,
    schedule: A::Schedule,
    counter: Counter<A::Block>,
    backend: BackendKind,
    kernel: BatchFn<A>,
    batch_blocks: usize,
}

impl<A: Backends> CounterEngine<A> {
    /// Creates an engine at counter zero on the detected backend.
    pub fn new(key: A::Key) -> Self {
        Self::with_counter(key, A::Block::zeroed())
    }

    /// Creates an engine at `counter` on the detected backend.
    pub fn with_counter(key: A::Key, counter: A::Block) -> Self {
        let (backend, kernel) = detected_kernel::<A>();
        Self::assemble(Key::new(key), Counter::new(counter), backend, kernel)
    }

    /// Creates an engine from a 64-bit seed placed in the low key words.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cbrng_core::kernels::Threefry2x64;
    /// use cbrng_engine::CounterEngine;
    ///
    /// let engine = CounterEngine::<Threefry2x64>::from_seed(0xABCD);
    /// assert_eq!(engine.key().words(), &[0xABCD, 0]);
    /// ```
    pub fn from_seed(seed: u64) -> Self {
        Self::new(*Key::<A::Key>::from_seed(seed).words())
    }

    /// Creates an engine from raw little-endian key bytes and optional
    /// counter bytes (zero when absent).
    ///
    /// # Errors
    ///
    /// [`CbrngError::InvalidKeyLength`] or [`CbrngError::InvalidCounterLength`]
    /// when a byte slice does not match the algorithm's sizes.
    pub fn from_bytes(key: &[u8], counter: Option<&[u8]>) -> Result<Self> {
        let key = Key::<A::Key>::from_bytes(key)?;
        let counter = match counter {
            Some(bytes) => Counter::<A::Block>::from_bytes(bytes)?,
            None => Counter::zero(),
        };
        Ok(Self::with_counter(*key.words(), counter.value()))
    }

    /// Creates an engine on an explicit backend, for conformance work.
    ///
    /// # Errors
    ///
    /// [`CbrngError::InvalidConfig`] if `kind` has no kernel for this
    /// algorithm or the CPU cannot run it.
    pub fn with_backend(key: A::Key, kind: BackendKind) -> Result<Self> {
        let kernel = forced_kernel::<A>(kind)?;
        Ok(Self::assemble(Key::new(key), Counter::zero(), kind, kernel))
    }

    /// Creates an engine from a validated [`EngineConfig`].
    ///
    /// # Errors
    ///
    /// [`CbrngError::InvalidConfig`] if the configuration is invalid or its
    /// backend has no kernel for this algorithm.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        let (backend, kernel) = match config.backend() {
            Some(kind) => (kind, forced_kernel::<A>(kind)?),
            None => detected_kernel::<A>(),
        };
        let mut engine = Self::assemble(
            Key::from_seed(config.seed()),
            Counter::zero(),
            backend,
            kernel,
        );
        engine.batch_blocks = config.batch_blocks();
        engine.discard(config.counter_offset());
        Ok(engine)
    }

    fn assemble(
        key: Key<A::Key>,
        counter: Counter<A::Block>,
        backend: BackendKind,
        kernel: BatchFn<A>,
    ) -> Self {
        debug!(algorithm = A::NAME, backend = %backend, "engine constructed");
        Self {
            schedule: A::schedule(key.words()),
            key,
            counter,
            backend,
            kernel,
            batch_blocks: DEFAULT_BATCH_BLOCKS,
        }
    }

    /// Encrypts the current counter and advances it by one block.
    #[inline]
    pub fn next_block(&mut self) -> A::Block {
        let mut out = [A::Block::zeroed()];
        self.next_blocks(&mut out);
        out[0]
    }

    /// Fills `out` with consecutive blocks.
    ///
    /// Equivalent to `out.len()` calls of [`next_block`](Self::next_block),
    /// including the final counter.
    #[inline]
    pub fn next_blocks(&mut self, out: &mut [A::Block]) {
        // SAFETY: `kernel` was resolved for `backend`, which the CPU supports.
        unsafe { (self.kernel)(&self.schedule, &mut self.counter, out) }
    }

    /// Skips `n` blocks without generating them. Wraps past the end of the
    /// counter range.
    #[inline]
    pub fn discard(&mut self, n: u64) {
        self.counter.increment_blocks(n);
    }

    /// Replaces the key; the counter is left as is.
    pub fn set_key(&mut self, key: A::Key) {
        self.key = Key::new(key);
        self.schedule = A::schedule(&key);
        debug!(algorithm = A::NAME, "key reset");
    }

    /// Replaces the counter.
    pub fn set_counter(&mut self, counter: A::Block) {
        self.counter.set(counter);
        debug!(algorithm = A::NAME, "counter reset");
    }

    /// Re-keys from `seed` and rewinds the counter to zero.
    pub fn reseed(&mut self, seed: u64) {
        self.set_key(*Key::<A::Key>::from_seed(seed).words());
        self.set_counter(A::Block::zeroed());
    }

    /// The key.
    #[inline]
    pub fn key(&self) -> &Key<A::Key> {
        &self.key
    }

    /// The counter of the next block.
    #[inline]
    pub fn counter(&self) -> &Counter<A::Block> {
        &self.counter
    }

    /// The backend this engine runs on.
    #[inline]
    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    /// Blocks per kernel call for bulk consumers such as
    /// [`CounterRng::fill_words`](crate::CounterRng::fill_words).
    /// [`DEFAULT_BATCH_BLOCKS`] unless set through [`EngineConfig`].
    #[inline]
    pub fn batch_blocks(&self) -> usize {
        self.batch_blocks
    }

    /// The algorithm name.
    #[inline]
    pub fn name(&self) -> &'static str {
        A::NAME
    }

    /// Snapshot of the algorithm, key and counter.
    pub fn state(&self) -> EngineState {
        EngineState {
            algorithm: A::NAME.to_string(),
            rounds: A::ROUNDS,
            key: self.key.to_bytes(),
            counter: self.counter.to_bytes(),
        }
    }

    /// Restores an engine from a snapshot, on the detected backend.
    ///
    /// # Errors
    ///
    /// [`CbrngError::UnknownAlgorithm`] if the snapshot names another
    /// algorithm or round count; length errors as in
    /// [`from_bytes`](Self::from_bytes).
    pub fn from_state(state: &EngineState) -> Result<Self> {
        if state.algorithm != A::NAME || state.rounds != A::ROUNDS {
            return Err(CbrngError::UnknownAlgorithm(format!(
                "{} with {} rounds (expected {} with {})",
                state.algorithm,
                state.rounds,
                A::NAME,
                A::ROUNDS
            )));
        }
        Self::from_bytes(&state.key, Some(&state.counter))
    }

    /// Key bytes followed by counter bytes.
    pub fn state_bytes(&self) -> Vec<u8> {
        self.state().to_bytes()
    }

    /// Restores an engine from [`state_bytes`](Self::state_bytes) output.
    ///
    /// # Errors
    ///
    /// [`CbrngError::InvalidStateLength`] unless the length is exactly key
    /// plus counter size.
    pub fn from_state_bytes(bytes: &[u8]) -> Result<Self> {
        let expected = A::Key::BYTES + A::Block::BYTES;
        if bytes.len() != expected {
            return Err(CbrngError::InvalidStateLength {
                expected,
                actual: bytes.len(),
            });
        }
        let (key, counter) = bytes.split_at(A::Key::BYTES);
        Self::from_bytes(key, Some(counter))
    }
}

impl<A: Backends> PartialEq for CounterEngine<A> {
    /// Engines are equal when they will produce the same stream, whatever
    /// backend they run on.
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.counter == other.counter
    }
}

impl<A: Backends> Eq for CounterEngine<A> {}

impl<A: Backends> fmt::Debug for CounterEngine<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CounterEngine")
            .field("algorithm", &A::NAME)
            .field("backend", &self.backend)
            .field("batch_blocks", &self.batch_blocks)
            .field("key", self.key.words())
            .field("counter", self.counter.words())
            .finish()
    }
}

fn detected_kernel<A: Backends>() -> (BackendKind, BatchFn<A>) {
    let kind = select_backend(A::FAMILY);
    match backend::resolve::<A>(kind) {
        Some(kernel) => (kind, kernel),
        None => (BackendKind::Generic, backend::generic::<A>()),
    }
}

fn forced_kernel<A: Backends>(kind: BackendKind) -> Result<BatchFn<A>> {
    if !kind.serves(A::FAMILY) {
        return Err(CbrngError::InvalidConfig(format!(
            "backend {} has no kernel for {}",
            kind,
            A::NAME
        )));
    }
    backend::resolve::<A>(kind).ok_or_else(|| {
        CbrngError::InvalidConfig(format!("backend {} is not supported by this CPU", kind))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbrng_core::kernels::{Aes128, Cbrng, Philox2x64, Philox4x32, Threefry4x32};

    #[test]
    fn test_next_block_advances_by_word_count() {
        let mut engine = CounterEngine::<Philox2x64>::new([5]);
        let first = engine.next_block();
        assert_eq!(first, Philox2x64::generate(&[5], &[0, 0]));
        assert_eq!(engine.counter().value(), [2, 0]);
        engine.next_block();
        assert_eq!(engine.counter().value(), [4, 0]);
    }

    #[test]
    fn test_discard_matches_generation() {
        let mut skipped = CounterEngine::<Threefry4x32>::new([1, 2, 3, 4]);
        let mut walked = skipped.clone();
        skipped.discard(10);
        for _ in 0..10 {
            walked.next_block();
        }
        assert_eq!(skipped, walked);
        assert_eq!(skipped.next_block(), walked.next_block());
    }

    #[test]
    fn test_discard_wraps() {
        let mut engine = CounterEngine::<Philox4x32>::new([0, 0]);
        engine.set_counter([u32::MAX - 3, u32::MAX, u32::MAX, u32::MAX]);
        engine.discard(1);
        assert!(engine.counter().is_zero());
    }

    #[test]
    fn test_from_bytes_length_errors() {
        let err = CounterEngine::<Philox4x32>::from_bytes(&[0u8; 7], None).unwrap_err();
        assert_eq!(
            err,
            CbrngError::InvalidKeyLength {
                expected: 8,
                actual: 7
            }
        );

        let err =
            CounterEngine::<Philox4x32>::from_bytes(&[0u8; 8], Some(&[0u8; 15])).unwrap_err();
        assert_eq!(
            err,
            CbrngError::InvalidCounterLength {
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn test_from_bytes_little_endian() {
        let engine =
            CounterEngine::<Philox4x32>::from_bytes(&[1, 0, 0, 0, 0, 0, 0, 2], Some(&[3; 16]))
                .unwrap();
        assert_eq!(engine.key().words(), &[1, 0x0200_0000]);
        assert_eq!(engine.counter().value(), [0x0303_0303; 4]);
    }

    #[test]
    fn test_with_backend_rejects_foreign_family() {
        let err = CounterEngine::<Aes128>::with_backend([0; 4], BackendKind::Sse2).unwrap_err();
        assert!(matches!(err, CbrngError::InvalidConfig(_)));

        let engine = CounterEngine::<Aes128>::with_backend([0; 4], BackendKind::Generic).unwrap();
        assert_eq!(engine.backend(), BackendKind::Generic);
    }

    #[test]
    fn test_reseed_resets_counter() {
        let mut engine = CounterEngine::<Philox4x32>::from_seed(1);
        engine.next_block();
        engine.reseed(2);
        assert_eq!(engine, CounterEngine::<Philox4x32>::from_seed(2));
    }

    #[test]
    fn test_set_key_keeps_counter() {
        let mut engine = CounterEngine::<Philox4x32>::new([1, 1]);
        engine.discard(3);
        engine.set_key([9, 9]);
        assert_eq!(engine.counter().value(), [12, 0, 0, 0]);
        assert_eq!(
            engine.next_block(),
            Philox4x32::generate(&[9, 9], &[12, 0, 0, 0])
        );
    }

    #[test]
    fn test_from_config_applies_offset() {
        let config = EngineConfig::builder()
            .seed(77)
            .counter_offset(5)
            .backend(Some(BackendKind::Generic))
            .build()
            .unwrap();
        let engine = CounterEngine::<Philox4x32>::from_config(&config).unwrap();
        assert_eq!(engine.key().words(), &[77, 0]);
        assert_eq!(engine.counter().value(), [20, 0, 0, 0]);
        assert_eq!(engine.backend(), BackendKind::Generic);
    }

    #[test]
    fn test_from_config_carries_batch_size() {
        let config = EngineConfig::builder().batch_blocks(3).build().unwrap();
        let engine = CounterEngine::<Philox4x32>::from_config(&config).unwrap();
        assert_eq!(engine.batch_blocks(), 3);
        assert_eq!(engine.clone().batch_blocks(), 3);
        assert_eq!(
            CounterEngine::<Philox4x32>::new([0, 0]).batch_blocks(),
            DEFAULT_BATCH_BLOCKS
        );
    }

    #[test]
    fn test_state_rejects_other_algorithm() {
        let mut state = CounterEngine::<Philox4x32>::new([1, 2]).state();
        state.algorithm = "threefry4x32".to_string();
        let err = CounterEngine::<Philox4x32>::from_state(&state).unwrap_err();
        assert!(matches!(err, CbrngError::UnknownAlgorithm(_)));
    }

    #[test]
    fn test_state_bytes_length() {
        let err = CounterEngine::<Philox4x32>::from_state_bytes(&[0u8; 23]).unwrap_err();
        assert_eq!(
            err,
            CbrngError::InvalidStateLength {
                expected: 24,
                actual: 23
            }
        );
    }

    #[test]
    fn test_debug_names_algorithm() {
        let engine = CounterEngine::<Philox4x32>::new([0, 0]);
        assert!(format!("{:?}", engine).contains("philox4x32"));
    }
}
