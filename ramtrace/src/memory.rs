//! Address resolution over the loaded segments of a memory snapshot
//!
//! A core dump only carries the part of the address space that was loaded
//! and dumped. Any address outside that subset is unrecoverable, so lookups
//! fail explicitly instead of returning zeroes.

use crate::domain::{ResolveError, VirtAddr};
use log::trace;

/// A contiguous, file-backed region of captured memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub virtual_start: VirtAddr,
    /// File-backed content, addressable by offset from `virtual_start`
    pub bytes: Vec<u8>,
}

impl Segment {
    #[must_use]
    pub fn new(virtual_start: impl Into<VirtAddr>, bytes: Vec<u8>) -> Self {
        Self { virtual_start: virtual_start.into(), bytes }
    }

    /// One past the last file-backed address
    #[must_use]
    pub fn virtual_end(&self) -> VirtAddr {
        VirtAddr(self.virtual_start.0.saturating_add(self.bytes.len() as u64))
    }

    /// Check if an address falls within the file-backed range
    #[must_use]
    pub fn contains(&self, addr: VirtAddr) -> bool {
        addr >= self.virtual_start && addr < self.virtual_end()
    }
}

/// Anything that can hand out the ordered segment table of a snapshot
pub trait SegmentSource {
    fn segments(&self) -> &[Segment];
}

impl SegmentSource for [Segment] {
    fn segments(&self) -> &[Segment] {
        self
    }
}

impl SegmentSource for Vec<Segment> {
    fn segments(&self) -> &[Segment] {
        self
    }
}

/// Return the `length` bytes backing `address`
///
/// Segments are scanned in the given order and the first one containing
/// `address` wins, even if a later one would also match.
///
/// # Errors
/// - [`ResolveError::AddressNotMapped`] if no segment contains `address`
/// - [`ResolveError::TruncatedRegion`] if the range runs past the matching
///   segment's data
pub fn resolve(
    address: VirtAddr,
    length: usize,
    segments: &[Segment],
) -> Result<&[u8], ResolveError> {
    let segment = segments
        .iter()
        .find(|s| s.contains(address))
        .ok_or(ResolveError::AddressNotMapped { address })?;

    let offset = address
        .offset_from(segment.virtual_start)
        .and_then(|offset| usize::try_from(offset).ok())
        .filter(|offset| *offset < segment.bytes.len())
        .ok_or(ResolveError::TruncatedRegion { address, length, available: 0 })?;
    let available = segment.bytes.len() - offset;

    trace!(
        "{} lies in segment {}..{} at offset 0x{:x}",
        address,
        segment.virtual_start,
        segment.virtual_end(),
        offset
    );

    if length > available {
        return Err(ResolveError::TruncatedRegion { address, length, available });
    }

    Ok(&segment.bytes[offset..offset + length])
}
