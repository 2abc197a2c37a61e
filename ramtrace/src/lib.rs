//! # ramtrace - RAM Trace Recovery from Coredumps
//!
//! When the modem trace RAM backend is enabled, the firmware keeps the most
//! recent trace bytes in a ring buffer (`ram_trace_buf`). After a crash the
//! coredump still holds that buffer. ramtrace finds it through the firmware's
//! symbol table and reassembles the unread bytes into one linear stream.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────┐        ┌──────────────┐
//! │ zephyr.elf   │        │  core.elf    │
//! │ (.symtab)    │        │  (PT_LOAD)   │
//! └──────┬───────┘        └──────┬───────┘
//!        │ SymbolFile            │ CoreDump
//!        ▼                       ▼
//!  control address ──▶ Address Resolver ──▶ 32-byte control structure
//!                              │                      │ decode
//!                              ▼                      ▼
//!                        backing array ◀──── buffer, size, cursors
//!                              │
//!                              ▼
//!                   unread region (maybe wrapped)
//!                              │
//!                              ▼
//!                    trace.bin  (+ report.json)
//! ```
//!
//! ## Module Structure
//!
//! - [`memory`]: segments and the address resolver (first matching segment wins)
//! - [`ring_buffer`]: control structure layout and unread-region reconstruction
//! - [`symbols`]: symbol table lookup via the `object` crate
//! - [`snapshot`]: coredump segment loading via the `object` crate
//! - [`extract`]: the end-to-end pipeline
//! - [`output`]: atomic output files, never a partial artifact
//! - [`export`]: optional JSON report
//! - [`preflight`]: input file checks with actionable messages
//! - [`cli`]: command-line argument parsing
//! - [`domain`]: core domain types and errors
//! - [`fixture`]: synthetic ELF images for tests and demos
//!
//! ## Typical Usage
//!
//! ```bash
//! ramtrace --coredump core.elf --symbols zephyr.elf --output trace.bin
//! ```

pub mod cli;
pub mod domain;
pub mod export;
pub mod extract;
pub mod fixture;
pub mod memory;
pub mod output;
pub mod preflight;
pub mod ring_buffer;
pub mod snapshot;
pub mod symbols;

pub use domain::{ExtractError, ResolveError, Stage, VirtAddr};
pub use extract::{extract_ring_buffer, DEFAULT_SYMBOL};
pub use memory::{resolve, Segment, SegmentSource};
pub use ring_buffer::{reconstruct, Extraction, RingBufferControl};
