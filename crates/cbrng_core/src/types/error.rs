//! Error types for generator construction.
//!
//! Generation itself never fails: counters wrap instead of overflowing.
//! The only failures are byte-length mismatches when keys, counters or
//! saved states are built from raw bytes, plus configuration errors
//! surfaced by higher layers.

use thiserror::Error;

/// Errors raised while constructing or restoring a generator.
///
/// # Examples
/// ```
/// use cbrng_core::types::CbrngError;
///
/// let err = CbrngError::InvalidKeyLength { expected: 8, actual: 3 };
/// assert_eq!(format!("{}", err), "Invalid key length: expected 8 bytes, got 3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CbrngError {
    /// Key bytes do not match the algorithm's key size.
    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Required byte length
        expected: usize,
        /// Supplied byte length
        actual: usize,
    },

    /// Counter bytes do not match the algorithm's block size.
    #[error("Invalid counter length: expected {expected} bytes, got {actual}")]
    InvalidCounterLength {
        /// Required byte length
        expected: usize,
        /// Supplied byte length
        actual: usize,
    },

    /// Saved state bytes do not match key plus counter size.
    #[error("Invalid state length: expected {expected} bytes, got {actual}")]
    InvalidStateLength {
        /// Required byte length
        expected: usize,
        /// Supplied byte length
        actual: usize,
    },

    /// Saved state names a different or unknown algorithm.
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// Invalid configuration parameter.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias for generator construction.
pub type Result<T> = std::result::Result<T, CbrngError>;
