//! Domain types providing compile-time safety and self-documentation

use std::fmt;

/// Virtual address in the captured process's address space
///
/// Kept distinct from file offsets and slice indices so the two can't be
/// mixed up when mapping an address onto a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VirtAddr(pub u64);

impl VirtAddr {
    /// Byte distance from `base` to this address, if this address is not below it
    #[must_use]
    pub fn offset_from(self, base: VirtAddr) -> Option<u64> {
        self.0.checked_sub(base.0)
    }
}

impl fmt::Display for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl From<u32> for VirtAddr {
    fn from(addr: u32) -> Self {
        VirtAddr(u64::from(addr))
    }
}

impl From<u64> for VirtAddr {
    fn from(addr: u64) -> Self {
        VirtAddr(addr)
    }
}

/// Pipeline step an extraction failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Looking up the control structure's symbol
    SymbolLookup,
    /// Reading the 32-byte ring buffer control structure
    ControlStructure,
    /// Reading the backing byte array the control structure points at
    BackingArray,
    /// Turning the decoded cursors into slices of the backing array
    SliceComputation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::SymbolLookup => "symbol lookup",
            Stage::ControlStructure => "control structure",
            Stage::BackingArray => "backing array",
            Stage::SliceComputation => "slice computation",
        };
        f.write_str(name)
    }
}
