//! # cbrng_engine: Dispatched Backends and Stream Engines
//!
//! ## Layer 2 (Engine) Role
//!
//! cbrng_engine turns the stateless kernels of `cbrng_core` into stateful
//! generators, providing:
//! - CPU capability detection and backend selection (`dispatch`)
//! - SSE2, AVX2, AVX-512 and AES-NI batched kernels behind one function
//!   pointer per engine (`backend`)
//! - The key/counter engine with discard, reset and saved state (`engine`)
//! - A `rand::RngCore` word stream (`rng`)
//! - Parallel stream splitting and fills (`streams`)
//! - The cross-backend conformance harness (`conformance`)
//!
//! ## Safety
//!
//! All `unsafe` code lives in the backend kernels. A kernel is only bound
//! to an engine after [`dispatch::capabilities`] reports its instruction
//! set, and every vector kernel is checked against the generic one by the
//! conformance harness.
//!
//! ## Usage Examples
//!
//! ```rust
//! use cbrng_core::kernels::Threefry4x64;
//! use cbrng_engine::{BackendKind, CounterEngine};
//!
//! let mut engine = CounterEngine::<Threefry4x64>::from_seed(2024);
//! let mut blocks = vec![[0u64; 4]; 1024];
//! engine.next_blocks(&mut blocks);
//!
//! let mut reference =
//!     CounterEngine::<Threefry4x64>::with_backend([2024, 0, 0, 0], BackendKind::Generic)
//!         .unwrap();
//! assert_eq!(reference.next_block(), blocks[0]);
//!
//! let restored = CounterEngine::<Threefry4x64>::from_state_bytes(&engine.state_bytes()).unwrap();
//! assert_eq!(restored, engine);
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` (default): Rayon-backed `streams` module
//! - `serde`: Serialisation for `EngineState`, `BackendKind` and core types

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod backend;
pub mod conformance;
pub mod dispatch;
pub mod engine;
pub mod rng;
#[cfg(feature = "parallel")]
pub mod streams;

pub use backend::{Backends, BatchFn};
pub use dispatch::{capabilities, select_backend, BackendKind, Capabilities, BACKEND_ENV};
pub use engine::{ConfigError, CounterEngine, EngineConfig, EngineConfigBuilder, EngineState};
pub use rng::CounterRng;
