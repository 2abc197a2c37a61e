//! Pre-flight checks for ramtrace
//!
//! Validates the input files before any ELF parsing happens.
//! Provides clear, actionable error messages when requirements aren't met.

use anyhow::{bail, Context, Result};
use log::warn;
use object::{Object, ObjectSection};
use std::path::Path;

/// Run all pre-flight checks on the input files
pub fn run_preflight_checks(coredump: &Path, symbols: &Path, quiet: bool) -> Result<()> {
    check_input_file(coredump, "--coredump")?;
    check_input_file(symbols, "--symbols")?;
    check_symbol_table(symbols, quiet)?;
    Ok(())
}

/// Check if an input file exists and is a regular file
fn check_input_file(path: &Path, flag: &str) -> Result<()> {
    if !path.exists() {
        bail!(
            "File not found: {}\n\n\
             Make sure the path passed to {flag} is correct.",
            path.display()
        );
    }
    if !path.is_file() {
        bail!(
            "Not a file: {}\n\n\
             {flag} must point to a file, not a directory.",
            path.display()
        );
    }
    Ok(())
}

/// Check if the symbol file still carries a symbol table
///
/// Returns `false` only for a parseable object without `.symtab`. The
/// warning is always logged; `quiet` only suppresses the stderr line.
fn check_symbol_table(path: &Path, quiet: bool) -> Result<bool> {
    let file_data =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let Ok(obj) = object::File::parse(&*file_data) else {
        // Not a valid object file, let the symbol loader report it
        return Ok(true);
    };

    let has_symtab = obj.section_by_name(".symtab").is_some_and(|s| s.size() > 0);
    if !has_symtab {
        warn!("{} has no .symtab (stripped?), symbol lookup will likely fail", path.display());
        if !quiet {
            eprintln!("warning: symbol file is stripped, pass the unstripped zephyr.elf");
        }
    }

    Ok(has_symtab)
}
