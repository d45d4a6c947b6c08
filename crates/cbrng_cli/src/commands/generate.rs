//! Generate command implementation
//!
//! Writes blocks from a key and counter to standard output.

use std::io::{self, BufWriter, Write};

use cbrng_core::convert::UnitInterval;
use cbrng_core::{Counter, Key, Word, WordArray};
use cbrng_engine::{BackendKind, Backends, CounterEngine, EngineConfig};
use tracing::info;

use super::{parse_hex, with_algorithm, Algorithm, OutputFormat};
use crate::Result;

/// Arguments of `cbrng generate`.
#[derive(Clone, Debug)]
pub struct GenerateArgs {
    /// Algorithm to run.
    pub algorithm: Algorithm,
    /// Seed used when no key is given.
    pub seed: u64,
    /// Full key as hex bytes.
    pub key: Option<String>,
    /// Starting counter as hex bytes.
    pub counter: Option<String>,
    /// Blocks skipped before output.
    pub offset: u64,
    /// Blocks written.
    pub blocks: u64,
    /// Blocks per kernel call.
    pub batch: usize,
    /// Forced backend.
    pub backend: Option<BackendKind>,
    /// Output encoding.
    pub format: OutputFormat,
}

/// Run the generate command
pub fn run(args: &GenerateArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    with_algorithm!(args.algorithm, generate(args, &mut out))?;
    out.flush()?;
    Ok(())
}

fn build_engine<A: Backends>(args: &GenerateArgs) -> Result<CounterEngine<A>> {
    let config = EngineConfig::builder()
        .seed(args.seed)
        .backend(args.backend)
        .batch_blocks(args.batch)
        .counter_offset(args.offset)
        .build()?;
    let mut engine = CounterEngine::<A>::from_config(&config)?;

    if let Some(hex) = &args.key {
        let key = Key::<A::Key>::from_bytes(&parse_hex(hex)?)?;
        engine.set_key(*key.words());
    }
    if let Some(hex) = &args.counter {
        let counter = Counter::<A::Block>::from_bytes(&parse_hex(hex)?)?;
        engine.set_counter(counter.value());
        engine.discard(args.offset);
    }
    Ok(engine)
}

fn generate<A: Backends>(args: &GenerateArgs, out: &mut impl Write) -> Result<()>
where
    A::Word: UnitInterval,
{
    let mut engine = build_engine::<A>(args)?;
    info!(
        algorithm = A::NAME,
        backend = %engine.backend(),
        blocks = args.blocks,
        offset = args.offset,
        "generating"
    );

    let mut buffer = vec![A::Block::zeroed(); engine.batch_blocks()];
    let mut remaining = args.blocks;
    while remaining > 0 {
        let n = remaining.min(buffer.len() as u64) as usize;
        let blocks = &mut buffer[..n];
        engine.next_blocks(blocks);
        write_blocks::<A>(blocks, args.format, out)?;
        remaining -= n as u64;
    }
    Ok(())
}

fn write_blocks<A: Backends>(
    blocks: &[A::Block],
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()>
where
    A::Word: UnitInterval,
{
    let digits = 2 * <A::Word as Word>::BYTES;
    match format {
        OutputFormat::Hex => {
            for block in blocks {
                let line = block
                    .as_slice()
                    .iter()
                    .map(|word| format!("{:0width$x}", word, width = digits))
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(out, "{}", line)?;
            }
        }
        OutputFormat::Unit => {
            for word in blocks.iter().flat_map(|block| block.as_slice()) {
                writeln!(out, "{:.17}", word.closed_open())?;
            }
        }
        OutputFormat::Raw => {
            let mut bytes = vec![0u8; A::Block::BYTES];
            for block in blocks {
                block.write_le_bytes(&mut bytes);
                out.write_all(&bytes)?;
            }
        }
    }
    Ok(())
}
