//! CLI command implementations
//!
//! Each submodule implements a specific CLI command. Commands are written
//! once, generic over the algorithm, and instantiated per algorithm through
//! [`with_algorithm!`].

pub mod bench;
pub mod generate;
pub mod info;
pub mod verify;

use clap::ValueEnum;

use crate::{CliError, Result};

/// Algorithms selectable on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    #[value(name = "philox2x32")]
    Philox2x32,
    #[value(name = "philox4x32")]
    Philox4x32,
    #[value(name = "philox2x64")]
    Philox2x64,
    #[value(name = "philox4x64")]
    Philox4x64,
    #[value(name = "threefry2x32")]
    Threefry2x32,
    #[value(name = "threefry4x32")]
    Threefry4x32,
    #[value(name = "threefry2x64")]
    Threefry2x64,
    #[value(name = "threefry4x64")]
    Threefry4x64,
    #[value(name = "threefry8x64")]
    Threefry8x64,
    #[value(name = "threefry16x64")]
    Threefry16x64,
    #[value(name = "threefish256")]
    Threefish256,
    #[value(name = "threefish512")]
    Threefish512,
    #[value(name = "threefish1024")]
    Threefish1024,
    #[value(name = "aes128")]
    Aes128,
    #[value(name = "aes192")]
    Aes192,
    #[value(name = "aes256")]
    Aes256,
    #[value(name = "ars")]
    Ars,
}

impl Algorithm {
    /// Every algorithm, in table order.
    pub fn all() -> &'static [Algorithm] {
        Self::value_variants()
    }
}

/// Output encodings for `generate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One block per line, words as fixed-width hex
    Hex,
    /// One word per line mapped into [0, 1)
    Unit,
    /// Little-endian bytes, no separators
    Raw,
}

/// Calls `$run::<A>(args..)` with `A` the type of `$algorithm`.
macro_rules! with_algorithm {
    ($algorithm:expr, $run:ident($($arg:expr),* $(,)?)) => {{
        use cbrng_core::kernels::*;
        use $crate::commands::Algorithm as Alg;
        match $algorithm {
            Alg::Philox2x32 => $run::<Philox2x32>($($arg),*),
            Alg::Philox4x32 => $run::<Philox4x32>($($arg),*),
            Alg::Philox2x64 => $run::<Philox2x64>($($arg),*),
            Alg::Philox4x64 => $run::<Philox4x64>($($arg),*),
            Alg::Threefry2x32 => $run::<Threefry2x32>($($arg),*),
            Alg::Threefry4x32 => $run::<Threefry4x32>($($arg),*),
            Alg::Threefry2x64 => $run::<Threefry2x64>($($arg),*),
            Alg::Threefry4x64 => $run::<Threefry4x64>($($arg),*),
            Alg::Threefry8x64 => $run::<Threefry8x64>($($arg),*),
            Alg::Threefry16x64 => $run::<Threefry16x64>($($arg),*),
            Alg::Threefish256 => $run::<Threefish256>($($arg),*),
            Alg::Threefish512 => $run::<Threefish512>($($arg),*),
            Alg::Threefish1024 => $run::<Threefish1024>($($arg),*),
            Alg::Aes128 => $run::<Aes128>($($arg),*),
            Alg::Aes192 => $run::<Aes192>($($arg),*),
            Alg::Aes256 => $run::<Aes256>($($arg),*),
            Alg::Ars => $run::<Ars>($($arg),*),
        }
    }};
}
pub(crate) use with_algorithm;

/// Parses hex bytes, with or without a `0x` prefix. Bytes are taken in the
/// order written.
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let digits = text.trim();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);
    if digits.len() % 2 != 0 {
        return Err(CliError::InvalidArgument(format!(
            "hex string '{}' has an odd number of digits",
            text
        )));
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| {
            digits
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| CliError::InvalidArgument(format!("invalid hex string '{}'", text)))
        })
        .collect()
}
