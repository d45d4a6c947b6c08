//! # cbrng_core: Counter-Based Random Number Generator Kernels
//!
//! ## Layer 1 (Foundation) Role
//!
//! cbrng_core is the bottom layer of the workspace, providing:
//! - Word, key and counter value types (`types`)
//! - Algorithm descriptors and portable scalar round kernels (`kernels`)
//! - Known-answer vectors for every algorithm (`kat`)
//! - The stable word-to-real mapping used by downstream samplers (`convert`)
//!
//! A counter-based generator is a keyed bijection on fixed-size blocks: the
//! output for a counter is a pure function of `(key, counter)`. Streams are
//! produced by encrypting successive counters, so any position of a stream
//! can be reached in constant time and independent streams need nothing more
//! than distinct keys or disjoint counter ranges.
//!
//! ## Scalar Reference
//!
//! The kernels here are word-at-a-time and target-independent. They are the
//! oracle for the vectorised backends in `cbrng_engine` and the fallback on
//! hardware without SIMD support.
//!
//! ## Usage Examples
//!
//! ```rust
//! use cbrng_core::kernels::{Cbrng, Threefry4x64};
//! use cbrng_core::types::Counter;
//!
//! let key = [1, 2, 3, 4];
//! let schedule = Threefry4x64::schedule(&key);
//!
//! let mut counter = Counter::<[u64; 4]>::zero();
//! let mut block = counter.value();
//! Threefry4x64::encrypt(&schedule, &mut block);
//! counter.increment_block();
//!
//! assert_eq!(block, Threefry4x64::generate(&key, &[0; 4]));
//! assert_eq!(counter.value(), [4, 0, 0, 0]);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Serialisation for `Counter`, `Key` and `Family`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod convert;
pub mod kat;
pub mod kernels;
pub mod types;

pub use kernels::{Cbrng, Family};
pub use types::{CbrngError, Counter, Key, Result, Word, WordArray};
