//! CLI argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::export::ByteOrder;

#[derive(Parser)]
#[command(
    name = "matcap",
    about = "Per-core segmented capture buffers for sampled memory addresses",
    after_help = "\
EXAMPLES:
    matcap simulate --capacity 1000 --samples 12000     Fill every core, drain to ./matcap-out
    matcap simulate --core 2 --capacity 100 --cpus 4    Allocate and fill only core 2
    matcap hex matcap-out/core0.bin                     Print one address per line"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Configure buffers, feed synthetic samples and drain every core
    Simulate(SimulateArgs),

    /// Convert a binary dump into one 0x%016x line per captured address
    Hex(HexArgs),
}

#[derive(clap::Args)]
pub struct SimulateArgs {
    /// Capture configuration (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the number of cores
    #[arg(long)]
    pub cpus: Option<usize>,

    /// Samples per segment
    #[arg(long, default_value = "1000")]
    pub capacity: i64,

    /// Allocate only this core (1 <= CORE < cpus) instead of every core
    #[arg(long)]
    pub core: Option<i64>,

    /// Synthetic samples fed to each allocated core
    #[arg(long, default_value = "1000")]
    pub samples: u64,

    /// Read size in bytes when draining a core
    #[arg(long, default_value = "4096")]
    pub chunk: usize,

    /// Directory receiving one coreN.bin per core
    #[arg(short, long, default_value = "matcap-out")]
    pub output_dir: PathBuf,

    /// Export the buffer status report as JSON
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(clap::Args)]
pub struct HexArgs {
    /// Binary dump read from the capture device
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Byte order of the 8-byte elements
    #[arg(long, value_enum, default_value_t = ByteOrder::Little)]
    pub byte_order: ByteOrder,
}
