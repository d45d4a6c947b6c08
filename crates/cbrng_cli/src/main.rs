//! cbrng - Command Line Operations for Counter-Based Generators
//!
//! # Commands
//!
//! - `cbrng info` - Report CPU capabilities and the backend chosen per algorithm
//! - `cbrng generate -a <algorithm>` - Write blocks as hex, unit reals or raw bytes
//! - `cbrng verify` - Run the cross-backend and known-answer conformance checks
//! - `cbrng bench -a <algorithm>` - Time every available backend
//!
//! Logging is controlled by `RUST_LOG`; the backend preference by
//! `CBRNG_BACKEND`.

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;

use commands::{Algorithm, OutputFormat};
pub use error::{CliError, Result};

/// Counter-based random number generator toolkit
#[derive(Parser)]
#[command(name = "cbrng")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report CPU capabilities and backend selection
    Info {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate blocks from a key and counter
    Generate {
        /// Algorithm to run
        #[arg(short, long, value_enum)]
        algorithm: Algorithm,

        /// 64-bit seed placed in the low key words
        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Full key as little-endian hex bytes (overrides --seed)
        #[arg(short, long)]
        key: Option<String>,

        /// Starting counter as little-endian hex bytes
        #[arg(short, long)]
        counter: Option<String>,

        /// Blocks to skip before output
        #[arg(long, default_value = "0")]
        offset: u64,

        /// Number of blocks to write
        #[arg(short = 'n', long, default_value = "4")]
        blocks: u64,

        /// Blocks per kernel call
        #[arg(long, default_value = "256")]
        batch: usize,

        /// Force a backend (generic, sse2, avx2, avx512, aesni)
        #[arg(short, long)]
        backend: Option<cbrng_engine::BackendKind>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "hex")]
        format: OutputFormat,
    },

    /// Check every backend against the generic one and the known answers
    Verify {
        /// Algorithm to check (all when omitted)
        #[arg(short, long, value_enum)]
        algorithm: Option<Algorithm>,

        /// Blocks per cross-backend comparison
        #[arg(short = 'n', long, default_value = "37")]
        blocks: usize,
    },

    /// Measure throughput of every available backend
    Bench {
        /// Algorithm to measure
        #[arg(short, long, value_enum)]
        algorithm: Algorithm,

        /// Blocks per kernel call
        #[arg(short = 'n', long, default_value = "4096")]
        blocks: usize,

        /// Timed repetitions per backend
        #[arg(short, long, default_value = "200")]
        iterations: usize,
    },
}

fn main() -> Result<()> {
    // Initialise tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Info { json } => commands::info::run(json),
        Commands::Generate {
            algorithm,
            seed,
            key,
            counter,
            offset,
            blocks,
            batch,
            backend,
            format,
        } => commands::generate::run(&commands::generate::GenerateArgs {
            algorithm,
            seed,
            key,
            counter,
            offset,
            blocks,
            batch,
            backend,
            format,
        }),
        Commands::Verify { algorithm, blocks } => commands::verify::run(algorithm, blocks),
        Commands::Bench {
            algorithm,
            blocks,
            iterations,
        } => commands::bench::run(algorithm, blocks, iterations),
    }
}
