//! End-to-end ring buffer extraction
//!
//! ```text
//! symbol name ──▶ SymbolResolver ──▶ control address
//!                                         │
//!                     SegmentSource ◀─────┘  resolve 32 bytes, decode
//!                          │
//!                          └──▶ resolve backing array ──▶ unread region
//! ```

use crate::domain::ExtractError;
use crate::memory::SegmentSource;
use crate::ring_buffer::{reconstruct, Extraction};
use crate::symbols::SymbolResolver;
use log::info;

/// Symbol of the modem trace RAM backend's ring buffer
pub const DEFAULT_SYMBOL: &str = "ram_trace_buf";

/// Locate `symbol` and reconstruct the unread bytes of the ring buffer it names
///
/// # Errors
/// [`ExtractError::SymbolNotFound`] if `symbol` is absent, otherwise any
/// error from [`reconstruct`].
pub fn extract_ring_buffer<S, M>(
    symbol: &str,
    symbols: &S,
    snapshot: &M,
) -> Result<Extraction, ExtractError>
where
    S: SymbolResolver + ?Sized,
    M: SegmentSource + ?Sized,
{
    let control_address = symbols
        .resolve_symbol_address(symbol)
        .ok_or_else(|| ExtractError::SymbolNotFound { name: symbol.to_string() })?;
    info!("Symbol {symbol} at {control_address}");

    let extraction = reconstruct(control_address, snapshot.segments())?;
    info!(
        "Recovered {} bytes from {}-byte buffer at {}{}",
        extraction.stored_size(),
        extraction.control.capacity,
        extraction.control.buffer_address(),
        if extraction.wrapped { " (wrapped)" } else { "" }
    );

    Ok(extraction)
}
