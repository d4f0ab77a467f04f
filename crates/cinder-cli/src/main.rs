//! Command-line driver for the Cinder VM.
//!
//! ```bash
//! # Run hex-encoded bytecode against in-memory state
//! cinder run --code 0x6005600601600055
//!
//! # Run against a persistent RocksDB state directory, tracing steps
//! cinder run --code-file program.hex --data-dir ./state --trace
//!
//! # Built-in demonstration scenarios
//! cinder simulate
//! cinder simulate --data-dir ./state
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use cinder_evm::{ExecutionContext, Halt, Interpreter, LogTracer, Tracer, VmConfig, Word};
use cinder_primitives::Address;
use cinder_storage::{MemoryStore, StateStore, Storage};

mod simulate;

/// Cinder VM
#[derive(Parser)]
#[command(name = "cinder")]
#[command(author, version, about = "Stack-based bytecode interpreter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute bytecode
    Run {
        /// Hex-encoded bytecode (0x prefix optional)
        #[arg(long, conflicts_with = "code_file")]
        code: Option<String>,

        /// File containing hex-encoded bytecode
        #[arg(long)]
        code_file: Option<PathBuf>,

        /// Hex-encoded calldata
        #[arg(long, default_value = "")]
        calldata: String,

        /// Gas budget
        #[arg(long, default_value = "100000")]
        gas: u64,

        /// Contract address
        #[arg(long, default_value = "0x1000000000000000000000000000000000000001")]
        contract: String,

        /// Sender address
        #[arg(long, default_value = "0x350fbde850998aac40f0b9364b4acea665a3d08c")]
        sender: String,

        /// Call value
        #[arg(long, default_value = "0")]
        value: u64,

        /// Persistent state directory (in-memory state when omitted)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Abort on unknown opcodes instead of skipping them
        #[arg(long)]
        strict: bool,

        /// Log every executed step
        #[arg(long)]
        trace: bool,
    },

    /// Run the built-in demonstration scenarios
    Simulate {
        /// Persistent state directory (in-memory state when omitted)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Contract address whose state the persistent scenario reads
        #[arg(long, default_value = "0x1000000000000000000000000000000000000001")]
        contract: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .init();

    match cli.command {
        Commands::Run {
            code,
            code_file,
            calldata,
            gas,
            contract,
            sender,
            value,
            data_dir,
            strict,
            trace,
        } => {
            let code = load_code(code, code_file)?;
            let calldata = decode_hex(&calldata).context("invalid calldata")?;
            let contract = Address::from_hex(&contract).context("invalid contract address")?;
            let sender = Address::from_hex(&sender).context("invalid sender address")?;
            let ctx = ExecutionContext::new(
                contract,
                sender,
                Word::from(value),
                Bytes::from(calldata),
                Bytes::from(code),
                gas,
            );
            let config = VmConfig {
                strict_opcodes: strict,
            };

            let mut tracer = LogTracer::new();
            let tracer: Option<&mut dyn Tracer> = if trace { Some(&mut tracer) } else { None };

            match data_dir {
                Some(dir) => {
                    let mut store = StateStore::open(&dir)
                        .with_context(|| format!("opening state at {}", dir.display()))?;
                    execute(ctx, &mut store, tracer, config)
                }
                None => {
                    let mut store = MemoryStore::new();
                    execute(ctx, &mut store, tracer, config)
                }
            }
        }
        Commands::Simulate { data_dir, contract } => {
            let contract = Address::from_hex(&contract).context("invalid contract address")?;
            match data_dir {
                Some(dir) => simulate::run_persistent(&dir, contract),
                None => simulate::run_volatile(),
            }
        }
    }
}

fn load_code(code: Option<String>, code_file: Option<PathBuf>) -> Result<Vec<u8>> {
    match (code, code_file) {
        (Some(hex_str), _) => decode_hex(&hex_str).context("invalid bytecode"),
        (None, Some(path)) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            decode_hex(text.trim()).context("invalid bytecode")
        }
        (None, None) => bail!("either --code or --code-file is required"),
    }
}

fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    Ok(hex::decode(s)?)
}

fn execute<'a>(
    ctx: ExecutionContext,
    storage: &'a mut dyn Storage,
    tracer: Option<&'a mut dyn Tracer>,
    config: VmConfig,
) -> Result<()> {
    let mut vm = Interpreter::with_config(ctx, storage, tracer, config);
    let outcome = vm.run();

    println!("halt:        {:?}", outcome.halt);
    println!("gas left:    {}", outcome.gas_remaining);
    println!("refund:      {}", outcome.refund);
    println!("return data: 0x{}", hex::encode(&outcome.return_data));
    println!("stack ({} items, top first):", vm.stack().len());
    for (i, word) in vm.stack().items().iter().rev().enumerate() {
        println!("  [{i}] {word:#x}");
    }

    if let Halt::Fatal(e) = outcome.halt {
        bail!("execution fault: {e}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_hex_accepts_optional_prefix() {
        assert_eq!(decode_hex("0x6005").unwrap(), vec![0x60, 0x05]);
        assert_eq!(decode_hex("6005").unwrap(), vec![0x60, 0x05]);
        assert!(decode_hex("0xzz").is_err());
    }

    #[test]
    fn load_code_requires_a_source() {
        assert!(load_code(None, None).is_err());
        assert_eq!(load_code(Some("0x00".into()), None).unwrap(), vec![0x00]);
    }
}
