//! Value types shared by every generator: words, keys, counters and errors.
//!
//! This module provides:
//! - [`Word`] and [`WordArray`]: unsigned words and their fixed-size arrays
//! - [`Counter`]: multi-word counter with modular increment
//! - [`Key`]: immutable fixed-size key
//! - [`CbrngError`]: construction errors

pub mod counter;
pub mod error;
pub mod key;
pub mod word;

pub use counter::Counter;
pub use error::{CbrngError, Result};
pub use key::Key;
pub use word::{Word, WordArray};
