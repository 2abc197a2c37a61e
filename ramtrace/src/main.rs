//! # ramtrace - Main Entry Point
//!
//! Reads a coredump and the matching firmware symbols, reconstructs the RAM
//! trace ring buffer and writes its unread bytes to the output file.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use ramtrace::cli::Args;
use ramtrace::export::ExtractionReport;
use ramtrace::output;
use ramtrace::preflight::run_preflight_checks;
use ramtrace::snapshot::CoreDump;
use ramtrace::symbols::SymbolFile;
use ramtrace::{extract_ring_buffer, ExtractError};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_DATAERR: i32 = 65;
const EXIT_NOINPUT: i32 = 66;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(extract) = err.downcast_ref::<ExtractError>() {
        return match extract {
            ExtractError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => EXIT_NOINPUT,
            ExtractError::Io(_) => EXIT_ERROR,
            _ => EXIT_DATAERR,
        };
    }
    if err.to_string().starts_with("File not found") {
        EXIT_NOINPUT
    } else {
        EXIT_ERROR
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    run_preflight_checks(&args.coredump, &args.symbols, args.quiet)?;

    let symbols = SymbolFile::open(&args.symbols)
        .with_context(|| format!("Failed to load symbols from {}", args.symbols.display()))?;
    let coredump = CoreDump::open(&args.coredump)
        .with_context(|| format!("Failed to load coredump {}", args.coredump.display()))?;

    let extraction = extract_ring_buffer(&args.symbol, &symbols, &coredump)?;

    if !args.quiet {
        println!("modem trace buffer contained {} bytes.", extraction.stored_size());
    }

    // Nothing is renamed into place until every output is staged
    let trace = output::stage_bytes(&args.output, &extraction.data)?;
    let report = args
        .report
        .as_deref()
        .map(|path| {
            ExtractionReport::new(&args.symbol, &extraction, Some(args.output.as_path())).stage(path)
        })
        .transpose()?;

    trace.commit()?;
    info!("Wrote {} bytes to {}", extraction.stored_size(), args.output.display());

    if let Some(report) = report {
        let report_path = report.path().to_path_buf();
        report.commit()?;
        info!("Wrote report to {}", report_path.display());
    }

    Ok(())
}
