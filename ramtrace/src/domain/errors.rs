//! Structured error types for ramtrace
//!
//! Using thiserror for automatic Display implementation and error chaining.

use super::types::{Stage, VirtAddr};
use std::path::PathBuf;
use thiserror::Error;

/// Failure to map a virtual address range onto the snapshot's segments
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("address {address} is not covered by any loaded segment")]
    AddressNotMapped { address: VirtAddr },

    #[error(
        "{length} bytes at {address} run past the end of segment data ({available} bytes available)"
    )]
    TruncatedRegion { address: VirtAddr, length: usize, available: usize },
}

impl ResolveError {
    /// Attribute this failure to a pipeline stage
    #[must_use]
    pub fn during(self, stage: Stage) -> ExtractError {
        match self {
            ResolveError::AddressNotMapped { address } => {
                ExtractError::AddressNotMapped { stage, address }
            }
            ResolveError::TruncatedRegion { address, length, available } => {
                ExtractError::TruncatedRegion { stage, address, length, available }
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("{}: symbol `{name}` not found in symbol table", Stage::SymbolLookup)]
    SymbolNotFound { name: String },

    #[error("{stage}: address {address} is not covered by any loaded segment")]
    AddressNotMapped { stage: Stage, address: VirtAddr },

    #[error(
        "{stage}: {length} bytes at {address} run past the end of segment data ({available} bytes available)"
    )]
    TruncatedRegion { stage: Stage, address: VirtAddr, length: usize, available: usize },

    #[error("{}: invalid ring buffer state: {reason}", Stage::SliceComputation)]
    InvalidRingBufferState { reason: String },

    #[error("Failed to parse ELF file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: object::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    /// Pipeline stage this error was raised in, if it belongs to one
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ExtractError::SymbolNotFound { .. } => Some(Stage::SymbolLookup),
            ExtractError::AddressNotMapped { stage, .. }
            | ExtractError::TruncatedRegion { stage, .. } => Some(*stage),
            ExtractError::InvalidRingBufferState { .. } => Some(Stage::SliceComputation),
            ExtractError::Parse { .. } | ExtractError::Io(_) => None,
        }
    }

    pub(crate) fn invalid_state(reason: impl Into<String>) -> Self {
        ExtractError::InvalidRingBufferState { reason: reason.into() }
    }
}
