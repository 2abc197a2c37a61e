//! Ring buffer control structure decoding and unread-region reconstruction
//!
//! The firmware keeps its trace data in a byte ring buffer described by a
//! 32-byte control structure. Cursors are logical positions that only ever
//! increase; a cursor is mapped into the backing array by subtracting its
//! base field.
//!
//! ```text
//! offset  field      type
//! 0x00    buffer     u32   address of the backing array
//! 0x04    put_head   i32
//! 0x08    put_tail   i32   last position committed by the producer
//! 0x0c    put_base   i32
//! 0x10    get_head   i32   first position not yet consumed
//! 0x14    get_tail   i32
//! 0x18    get_base   i32
//! 0x1c    size       u32   capacity of the backing array in bytes
//! ```
//!
//! All fields are little-endian. The layout is decoded field by field rather
//! than by casting onto a Rust struct.
//!
//! ## Wrap-around
//!
//! ```text
//! capacity = 16, start = 12, stored_size = 10, end = 22
//!
//!   array: [ 0 1 2 3 4 5 | 6 ... 11 | 12 13 14 15 ]
//!            ^^^^^^^^^^^               ^^^^^^^^^^^
//!            second part               first part
//!
//!   result = array[12..16] ++ array[0..6]
//! ```

use crate::domain::{ExtractError, ResolveError, Stage, VirtAddr};
use crate::memory::{resolve, Segment};
use log::debug;
use serde::Serialize;

/// Size in bytes of the encoded control structure
pub const CONTROL_SIZE: usize = 32;

/// Decoded ring buffer bookkeeping fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RingBufferControl {
    pub buffer: u32,
    pub put_head: i32,
    pub put_tail: i32,
    pub put_base: i32,
    pub get_head: i32,
    pub get_tail: i32,
    pub get_base: i32,
    /// Physical length of the backing array
    pub capacity: u32,
}

impl RingBufferControl {
    /// Decode the fixed little-endian layout. No field validation happens here.
    #[must_use]
    pub fn decode(raw: &[u8; CONTROL_SIZE]) -> Self {
        let word = |idx: usize| -> [u8; 4] {
            let at = idx * 4;
            [raw[at], raw[at + 1], raw[at + 2], raw[at + 3]]
        };

        Self {
            buffer: u32::from_le_bytes(word(0)),
            put_head: i32::from_le_bytes(word(1)),
            put_tail: i32::from_le_bytes(word(2)),
            put_base: i32::from_le_bytes(word(3)),
            get_head: i32::from_le_bytes(word(4)),
            get_tail: i32::from_le_bytes(word(5)),
            get_base: i32::from_le_bytes(word(6)),
            capacity: u32::from_le_bytes(word(7)),
        }
    }

    /// Encode back into the on-target layout
    #[must_use]
    pub fn encode(&self) -> [u8; CONTROL_SIZE] {
        let words = [
            self.buffer.to_le_bytes(),
            self.put_head.to_le_bytes(),
            self.put_tail.to_le_bytes(),
            self.put_base.to_le_bytes(),
            self.get_head.to_le_bytes(),
            self.get_tail.to_le_bytes(),
            self.get_base.to_le_bytes(),
            self.capacity.to_le_bytes(),
        ];

        let mut raw = [0u8; CONTROL_SIZE];
        for (chunk, word) in raw.chunks_exact_mut(4).zip(words) {
            chunk.copy_from_slice(&word);
        }
        raw
    }

    /// Number of bytes the consumer has not read yet (`put_tail - get_head`)
    #[must_use]
    pub fn stored_size(&self) -> i64 {
        i64::from(self.put_tail) - i64::from(self.get_head)
    }

    /// Physical index of the consumer cursor (`get_head - get_base`)
    #[must_use]
    pub fn start_offset(&self) -> i64 {
        i64::from(self.get_head) - i64::from(self.get_base)
    }

    #[must_use]
    pub fn buffer_address(&self) -> VirtAddr {
        VirtAddr::from(self.buffer)
    }

    /// Compute where the unread bytes live in the backing array
    ///
    /// # Errors
    /// Returns [`ExtractError::InvalidRingBufferState`] when the cursors can't
    /// describe a region of a `capacity`-byte array.
    pub fn unread_region(&self) -> Result<UnreadRegion, ExtractError> {
        let stored_size = self.stored_size();
        let start = self.start_offset();
        let capacity = i64::from(self.capacity);

        if stored_size < 0 {
            return Err(ExtractError::invalid_state(format!(
                "put_tail ({}) is behind get_head ({})",
                self.put_tail, self.get_head
            )));
        }
        if stored_size == 0 {
            return Ok(UnreadRegion::Empty);
        }
        if stored_size > capacity {
            return Err(ExtractError::invalid_state(format!(
                "{stored_size} unread bytes exceed capacity of {capacity}"
            )));
        }
        // start == capacity is a consumer parked at the physical end before
        // its base has been advanced
        if start < 0 || start > capacity {
            return Err(ExtractError::invalid_state(format!(
                "read offset {start} (get_head {} - get_base {}) outside 0..={capacity}",
                self.get_head, self.get_base
            )));
        }

        // Both values are in 0..=capacity, which came from a u32
        let to_index = |v: i64| {
            usize::try_from(v)
                .map_err(|_| ExtractError::invalid_state(format!("offset {v} does not fit in memory")))
        };
        let end = start + stored_size;

        if end > capacity {
            Ok(UnreadRegion::Wrapped {
                first: to_index(start)?..to_index(capacity)?,
                second: 0..to_index(end - capacity)?,
            })
        } else {
            Ok(UnreadRegion::Contiguous(to_index(start)?..to_index(end)?))
        }
    }
}

/// Location of the unread bytes inside the backing array
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnreadRegion {
    Empty,
    Contiguous(std::ops::Range<usize>),
    /// Tail of the array followed by its head
    Wrapped { first: std::ops::Range<usize>, second: std::ops::Range<usize> },
}

impl UnreadRegion {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            UnreadRegion::Empty => 0,
            UnreadRegion::Contiguous(range) => range.len(),
            UnreadRegion::Wrapped { first, second } => first.len() + second.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_wrapped(&self) -> bool {
        matches!(self, UnreadRegion::Wrapped { .. })
    }

    /// Copy the region out of `array` into one linear byte stream
    ///
    /// # Errors
    /// Returns [`ExtractError::InvalidRingBufferState`] if a range falls
    /// outside `array`.
    pub fn gather(&self, array: &[u8]) -> Result<Vec<u8>, ExtractError> {
        let slice = |range: &std::ops::Range<usize>| {
            array.get(range.clone()).ok_or_else(|| {
                ExtractError::invalid_state(format!(
                    "range {}..{} outside backing array of {} bytes",
                    range.start,
                    range.end,
                    array.len()
                ))
            })
        };

        match self {
            UnreadRegion::Empty => Ok(Vec::new()),
            UnreadRegion::Contiguous(range) => Ok(slice(range)?.to_vec()),
            UnreadRegion::Wrapped { first, second } => {
                let mut out = Vec::with_capacity(self.len());
                out.extend_from_slice(slice(first)?);
                out.extend_from_slice(slice(second)?);
                Ok(out)
            }
        }
    }
}

/// Result of reconstructing a ring buffer from a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub control_address: VirtAddr,
    pub control: RingBufferControl,
    /// Unread bytes in logical order
    pub data: Vec<u8>,
    pub wrapped: bool,
}

impl Extraction {
    /// Number of bytes recovered (`put_tail - get_head`)
    #[must_use]
    pub fn stored_size(&self) -> usize {
        self.data.len()
    }
}

/// Rebuild the unread contents of the ring buffer whose control structure
/// lives at `control_address`
///
/// # Errors
/// Fails with [`ExtractError::AddressNotMapped`] or
/// [`ExtractError::TruncatedRegion`] tagged with the stage that could not be
/// read, or [`ExtractError::InvalidRingBufferState`] for corrupt cursors.
pub fn reconstruct(
    control_address: VirtAddr,
    segments: &[Segment],
) -> Result<Extraction, ExtractError> {
    let raw = resolve(control_address, CONTROL_SIZE, segments)
        .map_err(|e| e.during(Stage::ControlStructure))?;
    let raw: &[u8; CONTROL_SIZE] = raw.try_into().map_err(|_| {
        ResolveError::TruncatedRegion {
            address: control_address,
            length: CONTROL_SIZE,
            available: raw.len(),
        }
        .during(Stage::ControlStructure)
    })?;
    let control = RingBufferControl::decode(raw);

    debug!(
        "control @ {}: buffer={} size={} put_head={} put_tail={} put_base={} get_head={} get_tail={} get_base={}",
        control_address,
        control.buffer_address(),
        control.capacity,
        control.put_head,
        control.put_tail,
        control.put_base,
        control.get_head,
        control.get_tail,
        control.get_base
    );

    let capacity = usize::try_from(control.capacity)
        .map_err(|_| ExtractError::invalid_state("capacity does not fit in memory"))?;
    let array = resolve(control.buffer_address(), capacity, segments)
        .map_err(|e| e.during(Stage::BackingArray))?;

    let region = control.unread_region()?;
    debug!("unread region: {region:?}");

    let data = region.gather(array)?;

    Ok(Extraction { control_address, control, data, wrapped: region.is_wrapped() })
}
