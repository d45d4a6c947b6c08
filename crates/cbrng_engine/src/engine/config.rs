//! Engine configuration.
//!
//! Configuration types and builders for constructing engines from a seed,
//! an optional forced backend and a starting offset.

use crate::dispatch::{capabilities, BackendKind};
use cbrng_core::CbrngError;
use thiserror::Error;

/// Largest batch, in blocks, a caller may request per kernel call.
pub const MAX_BATCH_BLOCKS: usize = 4096;

/// Default batch size in blocks.
pub const DEFAULT_BATCH_BLOCKS: usize = 256;

/// Configuration error for engine construction.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Forced backend cannot run on this CPU.
    #[error("Backend {0} is not supported by this CPU")]
    UnsupportedBackend(BackendKind),

    /// Batch size outside `[1, MAX_BATCH_BLOCKS]`.
    #[error("Invalid batch size {0}: must be in range [1, 4096]")]
    InvalidBatchSize(usize),
}

impl From<ConfigError> for CbrngError {
    fn from(err: ConfigError) -> Self {
        CbrngError::InvalidConfig(err.to_string())
    }
}

/// Engine configuration.
///
/// Immutable configuration consumed by
/// [`CounterEngine::from_config`](crate::CounterEngine::from_config).
/// Use [`EngineConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use cbrng_engine::{BackendKind, EngineConfig};
///
/// let config = EngineConfig::builder()
///     .seed(42)
///     .counter_offset(1_000)
///     .backend(Some(BackendKind::Generic))
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.seed(), 42);
/// assert_eq!(config.counter_offset(), 1_000);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Forced backend; `None` uses the detected one.
    backend: Option<BackendKind>,
    /// Seed placed in the low key words.
    seed: u64,
    /// Starting position in blocks.
    counter_offset: u64,
    /// Blocks per kernel call for bulk consumers.
    batch_blocks: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: None,
            seed: 0,
            counter_offset: 0,
            batch_blocks: DEFAULT_BATCH_BLOCKS,
        }
    }
}

impl EngineConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Returns the forced backend, if any.
    #[inline]
    pub fn backend(&self) -> Option<BackendKind> {
        self.backend
    }

    /// Returns the seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the starting offset in blocks.
    #[inline]
    pub fn counter_offset(&self) -> u64 {
        self.counter_offset
    }

    /// Returns the batch size in blocks.
    #[inline]
    pub fn batch_blocks(&self) -> usize {
        self.batch_blocks
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - the forced backend is not supported by the CPU
    /// - `batch_blocks` is 0 or greater than 4096
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(kind) = self.backend {
            if !capabilities().supports(kind) {
                return Err(ConfigError::UnsupportedBackend(kind));
            }
        }
        if self.batch_blocks == 0 || self.batch_blocks > MAX_BATCH_BLOCKS {
            return Err(ConfigError::InvalidBatchSize(self.batch_blocks));
        }
        Ok(())
    }
}

/// Builder for [`EngineConfig`].
///
/// # Examples
///
/// ```rust
/// use cbrng_engine::EngineConfig;
///
/// let config = EngineConfig::builder().seed(7).batch_blocks(64).build().unwrap();
/// assert_eq!(config.backend(), None);
/// assert_eq!(config.batch_blocks(), 64);
/// ```
#[derive(Clone, Debug, Default)]
pub struct EngineConfigBuilder {
    backend: Option<BackendKind>,
    seed: Option<u64>,
    counter_offset: Option<u64>,
    batch_blocks: Option<usize>,
}

impl EngineConfigBuilder {
    /// Forces a backend, or `None` for the detected one.
    #[inline]
    pub fn backend(mut self, backend: Option<BackendKind>) -> Self {
        self.backend = backend;
        self
    }

    /// Sets the seed.
    ///
    /// # Arguments
    ///
    /// * `seed` - 64-bit seed value
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the starting offset in blocks.
    #[inline]
    pub fn counter_offset(mut self, blocks: u64) -> Self {
        self.counter_offset = Some(blocks);
        self
    }

    /// Sets the batch size in blocks.
    ///
    /// # Arguments
    ///
    /// * `blocks` - Blocks per kernel call in [1, 4096]
    #[inline]
    pub fn batch_blocks(mut self, blocks: usize) -> Self {
        self.batch_blocks = Some(blocks);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        let defaults = EngineConfig::default();
        let config = EngineConfig {
            backend: self.backend,
            seed: self.seed.unwrap_or(defaults.seed),
            counter_offset: self.counter_offset.unwrap_or(defaults.counter_offset),
            batch_blocks: self.batch_blocks.unwrap_or(defaults.batch_blocks),
        };

        config.validate()?;
        Ok(config)
    }
}
