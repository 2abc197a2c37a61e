//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

use crate::extract::DEFAULT_SYMBOL;

#[derive(Parser, Debug)]
#[command(
    name = "ramtrace",
    version,
    about = "Extract the RAM modem trace ring buffer from a coredump",
    after_help = "\
EXAMPLES:
    ramtrace -c core.elf -s zephyr.elf -o trace.bin
    ramtrace -c core.elf -s zephyr.elf -o trace.bin --report trace.json"
)]
pub struct Args {
    /// Coredump ELF file
    #[arg(short, long, value_name = "FILE")]
    pub coredump: PathBuf,

    /// Symbols ELF file (unstripped firmware image)
    #[arg(short, long, value_name = "FILE")]
    pub symbols: PathBuf,

    /// Output BIN file
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Symbol of the ring buffer control structure
    #[arg(long, value_name = "NAME", default_value = DEFAULT_SYMBOL)]
    pub symbol: String,

    /// Also write a JSON report of the decoded ring buffer state
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}
